//! Shell - composes layout, workspace tree, viewer and chat
//!
//! Every network call runs as a spawned task that posts a [`Completion`]
//! back on a channel. Completions are applied one at a time by the owner of
//! the shell (the TUI event loop), so all state transitions happen on a
//! single task and stale results are filtered by each component's tag
//! (tree generation, selection token, session id).

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ChatService, WorkspaceService};
use crate::chat::{ConversationSession, SessionId, TurnRequest};
use crate::error::ApiError;
use crate::layout::LayoutController;
use crate::viewer::{FileSelection, ReadRequest};
use crate::workspace::{ListingRequest, TreeAction, TreeNode, WorkspaceTree};

/// Result of a background request
#[derive(Debug, Clone)]
pub enum Completion {
    Listing {
        request: ListingRequest,
        result: Result<Vec<TreeNode>, ApiError>,
    },
    FileRead {
        request: ReadRequest,
        result: Result<String, ApiError>,
    },
    Turn {
        session_id: SessionId,
        result: Result<String, ApiError>,
    },
    ConversationDeleted {
        session_id: SessionId,
        result: Result<(), ApiError>,
    },
}

/// Backend services the shell dispatches to
#[derive(Clone)]
pub struct Services {
    pub workspace: Arc<dyn WorkspaceService>,
    pub chat: Arc<dyn ChatService>,
}

impl Services {
    pub fn new(workspace: Arc<dyn WorkspaceService>, chat: Arc<dyn ChatService>) -> Self {
        Self { workspace, chat }
    }
}

/// Client state plus the plumbing that feeds it
pub struct Shell {
    layout: LayoutController,
    tree: WorkspaceTree,
    viewer: FileSelection,
    chat: ConversationSession,
    services: Services,
    completions: mpsc::Sender<Completion>,
}

impl Shell {
    /// Create a shell; completions are posted to `completions`
    pub fn new(
        layout: LayoutController,
        services: Services,
        completions: mpsc::Sender<Completion>,
    ) -> Self {
        Self {
            layout,
            tree: WorkspaceTree::new(),
            viewer: FileSelection::new(),
            chat: ConversationSession::new(),
            services,
            completions,
        }
    }

    pub fn layout(&self) -> &LayoutController {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutController {
        &mut self.layout
    }

    pub fn tree(&self) -> &WorkspaceTree {
        &self.tree
    }

    pub fn viewer(&self) -> &FileSelection {
        &self.viewer
    }

    pub fn chat(&self) -> &ConversationSession {
        &self.chat
    }

    /// Chat access for input editing
    pub fn chat_mut(&mut self) -> &mut ConversationSession {
        &mut self.chat
    }

    /// Load the workspace root
    pub fn mount(&mut self) {
        if let Some(request) = self.tree.mount() {
            self.dispatch_listing(request);
        }
    }

    /// Toggle a directory or select a file
    pub fn activate(&mut self, node: &TreeNode) {
        match self.tree.activate(node) {
            TreeAction::Fetch(request) => self.dispatch_listing(request),
            TreeAction::Select(file) => {
                let request = self.viewer.select(file);
                self.dispatch_read(request);
            }
            TreeAction::Toggled => {}
        }
    }

    /// Invalidate the tree and reload every expanded directory
    pub fn refresh_tree(&mut self) {
        let requests = self.tree.refresh();
        info!("Refreshing workspace tree ({} directories)", requests.len());
        for request in requests {
            self.dispatch_listing(request);
        }
    }

    /// Send `text` as a chat turn
    pub fn send_message(&mut self, text: &str) -> bool {
        match self.chat.send(text) {
            Some(turn) => {
                self.dispatch_turn(turn);
                true
            }
            None => false,
        }
    }

    /// Send the composed chat input
    pub fn submit_input(&mut self) -> bool {
        match self.chat.submit() {
            Some(turn) => {
                self.dispatch_turn(turn);
                true
            }
            None => false,
        }
    }

    /// Reset the conversation and ask the server to forget the old one
    pub fn clear_chat(&mut self) {
        let retired = self.chat.clear();
        let chat = self.services.chat.clone();
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let result = chat.delete_conversation(&retired).await;
            let _ = tx
                .send(Completion::ConversationDeleted {
                    session_id: retired,
                    result,
                })
                .await;
        });
    }

    /// Apply a completion; returns true if visible state changed
    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Listing { request, result } => self.tree.apply_listing(&request, result),
            Completion::FileRead { request, result } => self.viewer.apply_read(&request, result),
            Completion::Turn { session_id, result } => self.chat.complete(session_id, result),
            Completion::ConversationDeleted { session_id, result } => {
                match result {
                    Ok(()) => debug!("Deleted conversation {}", session_id),
                    Err(e) => warn!("Failed to delete conversation {}: {}", session_id, e),
                }
                false
            }
        }
    }

    fn dispatch_listing(&self, request: ListingRequest) {
        let workspace = self.services.workspace.clone();
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let result = workspace.list_directory(&request.path).await;
            let _ = tx.send(Completion::Listing { request, result }).await;
        });
    }

    fn dispatch_read(&self, request: ReadRequest) {
        let workspace = self.services.workspace.clone();
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let result = workspace.read_file(&request.path).await;
            let _ = tx.send(Completion::FileRead { request, result }).await;
        });
    }

    fn dispatch_turn(&self, turn: TurnRequest) {
        let chat = self.services.chat.clone();
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let result = chat.send_turn(&turn.session_id, &turn.message).await;
            let _ = tx
                .send(Completion::Turn {
                    session_id: turn.session_id,
                    result,
                })
                .await;
        });
    }
}
