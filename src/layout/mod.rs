//! Split-pane layout
//!
//! - `LayoutController` - sidebar width and drag-resize state
//! - `PointerTracker` - scoped global pointer tracking used during a drag

mod controller;
mod pointer;

pub use controller::*;
pub use pointer::*;
