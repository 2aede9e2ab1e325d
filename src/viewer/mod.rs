//! Content viewer
//!
//! - `FileSelection` - the selected file and its freshly fetched content
//! - `language_for` - extension lookup for the viewer title

mod language;
mod selection;

pub use language::*;
pub use selection::*;
