//! Configuration module
//!
//! Handles user configuration (`<config dir>/ai-code-assistant/config.toml`).
//! Nothing else is persisted: workspace, selection and chat state live only
//! as long as the process.

mod settings;

pub use settings::*;
