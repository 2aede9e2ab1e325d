//! AI Code Assistant - terminal client for a remote workspace and its AI assistant
//!
//! The client browses the backend's workspace as a lazily loaded tree, shows
//! file contents, and holds a chat conversation with an assistant that can
//! read and edit those files.
//!
//! # Architecture
//!
//! All client state is owned by a single event loop. Network calls run as
//! spawned tasks and report back as completions, which each component
//! filters for staleness before applying:
//! - **Layout** - sidebar width and divider drag
//! - **Workspace tree** - expansion set and per-generation listing cache
//! - **Viewer** - the selected file and its content (last selection wins)
//! - **Chat** - transcript, turn-taking and session reset
//!
//! # Modules
//!
//! - [`api`] - Service traits and the HTTP client
//! - [`workspace`] - Lazily loaded workspace tree
//! - [`viewer`] - File selection and language lookup
//! - [`chat`] - Conversation session
//! - [`layout`] - Split-pane geometry and drag handling
//! - [`shell`] - Composition and request dispatch
//! - [`tui`] - Event-driven terminal UI with ratatui
//! - [`config`] - Configuration
//! - [`error`] - Error types

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod layout;
pub mod shell;
pub mod tui;
pub mod viewer;
pub mod workspace;

pub use config::Config;
pub use error::{ApiError, Error, Result};
pub use shell::{Completion, Services, Shell};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
