//! Conversation session lifecycle
//!
//! One session owns its transcript, its in-flight turn and its identity.
//! Like the workspace tree it performs no I/O: `send` yields a
//! [`TurnRequest`] for the caller to execute and the reply comes back through
//! [`ConversationSession::complete`].

use std::fmt;

use tracing::{debug, info, warn};

use super::types::{Message, SessionId, Transcript};
use crate::error::ApiError;

/// Turn-taking state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    AwaitingResponse,
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AwaitingResponse => write!(f, "waiting"),
        }
    }
}

/// A chat turn the caller should send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    pub session_id: SessionId,
    pub message: String,
}

/// One logical conversation with the assistant
#[derive(Debug, Default)]
pub struct ConversationSession {
    session_id: SessionId,
    transcript: Transcript,
    state: TurnState,
    /// Text being composed; not editable while awaiting a reply
    input: String,
}

impl ConversationSession {
    /// Start a session with a freshly minted id
    pub fn new() -> Self {
        let session = Self::default();
        info!("Started chat session {}", session.session_id);
        session
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn is_awaiting(&self) -> bool {
        self.state == TurnState::AwaitingResponse
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Whether the input box accepts edits and submission
    pub fn input_enabled(&self) -> bool {
        !self.is_awaiting()
    }

    pub fn push_char(&mut self, c: char) {
        if self.input_enabled() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if self.input_enabled() {
            self.input.pop();
        }
    }

    /// Send the composed input; clears it when a turn is started
    pub fn submit(&mut self) -> Option<TurnRequest> {
        let text = self.input.clone();
        let request = self.send(&text)?;
        self.input.clear();
        Some(request)
    }

    /// Start a turn with `text`
    ///
    /// No-op for blank text or while a reply is pending. Otherwise the user
    /// message is appended immediately and the session waits for the reply.
    pub fn send(&mut self, text: &str) -> Option<TurnRequest> {
        if text.trim().is_empty() {
            return None;
        }
        if self.is_awaiting() {
            debug!("Turn already in flight, ignoring send");
            return None;
        }

        self.transcript.append(Message::user(text));
        self.state = TurnState::AwaitingResponse;
        debug!(session = %self.session_id, "Turn started");

        Some(TurnRequest {
            session_id: self.session_id,
            message: text.to_string(),
        })
    }

    /// Finish the in-flight turn
    ///
    /// Failures become an assistant message describing the error. Replies
    /// for a session that has since been cleared are dropped. Returns true
    /// if the transcript changed.
    pub fn complete(&mut self, session_id: SessionId, result: Result<String, ApiError>) -> bool {
        if session_id != self.session_id {
            debug!(stale = %session_id, current = %self.session_id, "Dropping reply for cleared session");
            return false;
        }

        let message = match result {
            Ok(reply) => Message::assistant(reply),
            Err(e) => {
                warn!(session = %self.session_id, "Chat turn failed: {}", e);
                Message::assistant(format!("Error: {e}"))
            }
        };

        self.transcript.append(message);
        self.state = TurnState::Idle;
        true
    }

    /// Reset to an empty conversation under a new id
    ///
    /// Returns the retired id so the caller can ask the server to delete it.
    /// Local state resets regardless of what happens to that request.
    pub fn clear(&mut self) -> SessionId {
        let retired = self.session_id;
        self.session_id = SessionId::new();
        self.transcript = Transcript::new();
        self.state = TurnState::Idle;
        info!(retired = %retired, current = %self.session_id, "Chat session cleared");
        retired
    }
}
