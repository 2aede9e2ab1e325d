//! Event handling for the TUI
//!
//! Provides an async event stream that combines:
//! - Terminal input events (keyboard, mouse)
//! - Completions of background requests
//! - Render ticks

use std::time::Duration;

use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyModifiers, MouseEvent,
    MouseEventKind,
};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tracing::debug;

use super::app::FocusedPane;
use crate::error::ApiError;
use crate::layout::PointerTracker;
use crate::shell::Completion;

/// Application events
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Terminal input event
    Input(InputEvent),
    /// Background request finished
    Completion(Completion),
    /// Result of the startup health check
    Health(Result<String, ApiError>),
    /// Render tick
    Tick,
    /// Request to quit the application
    Quit,
}

/// Input events from the terminal
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Key press
    Key(KeyEvent),
    /// Mouse event
    Mouse(MouseEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// User commands triggered by input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Move the tree cursor up
    NavigateUp,
    /// Move the tree cursor down
    NavigateDown,
    /// Expand/collapse directory or open file
    Activate,
    /// Reload every expanded directory
    Refresh,
    /// Cycle focus between panes
    TogglePane,
    /// Shrink the sidebar
    NarrowSidebar,
    /// Grow the sidebar
    WidenSidebar,
    /// Start a new conversation
    ClearChat,
    /// Send the chat input
    Submit,
    /// Text input
    TextInput(char),
    /// Backspace in text input
    Backspace,
    /// Scroll focused pane up
    ScrollUp,
    /// Scroll focused pane down
    ScrollDown,
    /// Page up in focused pane
    PageUp,
    /// Page down in focused pane
    PageDown,
    /// Show help
    ShowHelp,
    /// Leave the chat input / close overlays
    Cancel,
    /// Quit application
    Quit,
}

impl UserCommand {
    /// Convert a key event to a user command for the focused pane
    pub fn from_key(key: KeyEvent, focus: FocusedPane) -> Option<Self> {
        // Bindings that work everywhere
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Some(UserCommand::Quit),
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => return Some(UserCommand::ClearChat),
            (KeyCode::Tab, _) => return Some(UserCommand::TogglePane),
            (KeyCode::PageUp, _) => return Some(UserCommand::PageUp),
            (KeyCode::PageDown, _) => return Some(UserCommand::PageDown),
            _ => {}
        }

        if focus == FocusedPane::Chat {
            return match (key.code, key.modifiers) {
                (KeyCode::Enter, _) => Some(UserCommand::Submit),
                (KeyCode::Esc, _) => Some(UserCommand::Cancel),
                (KeyCode::Backspace, _) => Some(UserCommand::Backspace),
                (KeyCode::Up, _) => Some(UserCommand::ScrollUp),
                (KeyCode::Down, _) => Some(UserCommand::ScrollDown),
                (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                    Some(UserCommand::TextInput(c))
                }
                _ => None,
            };
        }

        match (key.code, key.modifiers) {
            // Navigation
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
                Some(match focus {
                    FocusedPane::Viewer => UserCommand::ScrollUp,
                    _ => UserCommand::NavigateUp,
                })
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
                Some(match focus {
                    FocusedPane::Viewer => UserCommand::ScrollDown,
                    _ => UserCommand::NavigateDown,
                })
            }

            // Tree
            (KeyCode::Enter, _) | (KeyCode::Char(' '), _) => Some(UserCommand::Activate),
            (KeyCode::Char('r'), KeyModifiers::NONE) => Some(UserCommand::Refresh),

            // Layout
            (KeyCode::Char('<'), _) => Some(UserCommand::NarrowSidebar),
            (KeyCode::Char('>'), _) => Some(UserCommand::WidenSidebar),

            // Help and quit
            (KeyCode::Char('?'), _) => Some(UserCommand::ShowHelp),
            (KeyCode::Char('q'), KeyModifiers::NONE) => Some(UserCommand::Quit),
            (KeyCode::Esc, _) => Some(UserCommand::Cancel),

            _ => None,
        }
    }
}

/// Whether a mouse event is part of a drag and only wanted while tracking
fn is_tracking_event(mouse: &MouseEvent) -> bool {
    matches!(mouse.kind, MouseEventKind::Drag(_) | MouseEventKind::Moved)
}

/// Event loop handle
pub struct EventLoop {
    /// Sender for events
    tx: mpsc::Sender<AppEvent>,
    /// Receiver for events
    rx: mpsc::Receiver<AppEvent>,
}

impl EventLoop {
    /// Create a new event loop
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(256);
        Self { tx, rx }
    }

    /// Get a sender for posting events
    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }

    /// Start the event loop
    ///
    /// This spawns background tasks for:
    /// - Terminal input
    /// - Render ticks
    ///
    /// Drag and move events are forwarded only while `pointer` is attached.
    pub fn start(&mut self, tick_rate: Duration, pointer: PointerTracker) {
        let tx = self.tx.clone();

        // Terminal input task - single long-running reader
        tokio::spawn(async move {
            let mut reader = EventStream::new();

            loop {
                let event = reader.next().fuse().await;

                match event {
                    Some(Ok(event)) => {
                        let app_event = match event {
                            CrosstermEvent::Key(key) => AppEvent::Input(InputEvent::Key(key)),
                            CrosstermEvent::Mouse(mouse) => {
                                if is_tracking_event(&mouse) && !pointer.is_attached() {
                                    continue;
                                }
                                AppEvent::Input(InputEvent::Mouse(mouse))
                            }
                            CrosstermEvent::Resize(w, h) => {
                                AppEvent::Input(InputEvent::Resize(w, h))
                            }
                            _ => continue,
                        };

                        if tx.send(app_event).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("Error reading terminal event: {}", e);
                        continue;
                    }
                    None => break,
                }
            }
        });

        // Render tick task
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);

            loop {
                interval.tick().await;
                if tx.send(AppEvent::Tick).await.is_err() {
                    break;
                }
            }
        });
    }

    /// Forward shell completions into the event stream
    pub fn forward_completions(&self, mut completions: mpsc::Receiver<Completion>) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            while let Some(completion) = completions.recv().await {
                if tx.send(AppEvent::Completion(completion)).await.is_err() {
                    break;
                }
            }
        });
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}
