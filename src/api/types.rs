//! Request and response bodies of the backend HTTP API
//!
//! Only the fields the client reads are declared; extra fields the server
//! echoes back (`path`, `session_id`) are ignored.

use serde::{Deserialize, Serialize};

use crate::workspace::TreeNode;

#[derive(Debug, Clone, Serialize)]
pub struct PathRequest<'a> {
    pub path: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListDirectoryResponse {
    pub items: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadFileResponse {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub session_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Server-side conversation history; entries are provider-shaped JSON
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub messages: Vec<serde_json::Value>,
}

/// Error body of a non-2xx response
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Flatten `detail` to a display string (it may be a string or a list)
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
