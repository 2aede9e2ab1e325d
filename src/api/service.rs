//! Service seams
//!
//! The client state machines talk to the backend only through these traits,
//! so tests can substitute in-memory fakes for the HTTP client.

use async_trait::async_trait;

use crate::chat::SessionId;
use crate::error::ApiError;
use crate::workspace::TreeNode;

/// Remote workspace: directory listing and file reads
#[async_trait]
pub trait WorkspaceService: Send + Sync {
    /// List the direct children of `path` (`"."` is the root), in server order
    async fn list_directory(&self, path: &str) -> Result<Vec<TreeNode>, ApiError>;

    /// Read a file's full text
    async fn read_file(&self, path: &str) -> Result<String, ApiError>;
}

/// Remote chat/inference service
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Complete one turn of the conversation identified by `session_id`
    async fn send_turn(&self, session_id: &SessionId, message: &str) -> Result<String, ApiError>;

    /// Drop the server-side conversation
    async fn delete_conversation(&self, session_id: &SessionId) -> Result<(), ApiError>;
}
