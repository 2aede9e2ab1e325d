//! Chat with the assistant
//!
//! - `SessionId`, `Message`, `Transcript` - conversation data
//! - `ConversationSession` - turn-taking and reset

mod session;
mod types;

pub use session::*;
pub use types::*;
