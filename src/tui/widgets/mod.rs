//! TUI widgets
//!
//! Custom ratatui widgets for the application:
//! - `TreeList` - Workspace tree with placeholder rows
//! - `FileView` - File content with line numbers
//! - `ChatView` - Transcript, typing indicator and input box

mod chat_view;
mod file_view;
mod tree_list;

pub use chat_view::*;
pub use file_view::*;
pub use tree_list::*;
