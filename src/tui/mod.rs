//! Terminal UI module using ratatui
//!
//! Event-driven TUI with:
//! - Resizable workspace sidebar (keyboard or mouse drag on the divider)
//! - Chat pane with typing indicator
//! - File viewer that appears once a file is selected
//! - Help overlay and status bar

mod app;
mod event;
pub mod theme;
mod widgets;

pub use app::*;
pub use event::*;
