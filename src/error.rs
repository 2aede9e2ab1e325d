//! Error types for ai-code-assistant
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `Display` and `Error` impls.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for ai-code-assistant
#[derive(Error, Debug)]
pub enum Error {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),
}

/// Failures talking to the workspace or chat service
///
/// Every variant is recoverable: components degrade to an empty listing,
/// an inline error string, or a synthesized assistant message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// Non-2xx response
    #[error("Server returned {status}: {detail}")]
    Server { status: u16, detail: String },

    /// Empty or undecodable response body
    #[error("Malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether the request reached the server at all
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

/// TUI-related errors
#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Failed to initialize terminal: {0}")]
    InitFailed(String),

    #[error("Failed to restore terminal: {0}")]
    RestoreFailed(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Server {
            status: 404,
            detail: "File not found: nope.txt".to_string(),
        };
        assert_eq!(err.to_string(), "Server returned 404: File not found: nope.txt");

        let err = ApiError::Transport {
            url: "http://localhost:8000/api/chat".to_string(),
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("connection refused"));
        assert!(err.is_transport());

        let err = ConfigError::DirectoryCreationFailed(PathBuf::from("/tmp/foo"));
        assert!(err.to_string().contains("/tmp/foo"));
    }

    #[test]
    fn test_error_conversion() {
        let api_err = ApiError::InvalidUrl("::".to_string());
        let top: Error = api_err.into();
        assert!(matches!(top, Error::Api(ApiError::InvalidUrl(_))));

        let config_err = ConfigError::LoadFailed("bad".to_string());
        let _top_err: Error = config_err.into();
    }
}
