//! Main TUI application
//!
//! Event-driven application that coordinates:
//! - Terminal rendering with ratatui
//! - Keyboard and mouse input, including the divider drag
//! - Completions of background requests posted by the shell

use std::io::{self, Stdout};
use std::sync::Arc;

use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyEventKind, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::event::{AppEvent, EventLoop, InputEvent, UserCommand};
use super::theme::Theme;
use super::widgets::{ChatScrollState, ChatView, FileView, TreeList, TreeListState, ViewerState};
use crate::api::HttpClient;
use crate::config::Config;
use crate::error::{ApiError, Result, TuiError};
use crate::layout::LayoutController;
use crate::shell::{Completion, Services, Shell};
use crate::viewer::{language_for, FileContent};
use crate::workspace::TreeRow;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPane {
    #[default]
    Tree,
    Chat,
    Viewer,
}

impl FocusedPane {
    /// Next pane in Tab order; the viewer is skipped while it is hidden
    pub fn next(self, viewer_open: bool) -> Self {
        match self {
            Self::Tree => Self::Chat,
            Self::Chat if viewer_open => Self::Viewer,
            Self::Chat | Self::Viewer => Self::Tree,
        }
    }
}

/// Modal dialog state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// No modal open
    None,
    /// Help modal
    Help,
}

/// Result of the startup health check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatus {
    Checking,
    Online(String),
    Offline(String),
}

/// Screen areas from the last render, used for mouse hit testing
#[derive(Debug, Clone, Copy, Default)]
pub struct PaneAreas {
    pub tree: Rect,
    pub divider: Rect,
    pub chat: Rect,
    pub viewer: Option<Rect>,
}

/// Application UI state
pub struct AppUiState {
    /// Tree cursor
    pub tree_state: TreeListState,
    /// Viewer scroll
    pub viewer_state: ViewerState,
    /// Transcript scroll
    pub chat_scroll: ChatScrollState,
    /// Typing indicator animation
    pub throbber: ThrobberState,
    /// Currently focused pane
    pub focused_pane: FocusedPane,
    /// Current modal
    pub modal: Modal,
    /// Visible tree rows
    pub rows: Vec<TreeRow>,
    /// Status message
    pub status_message: Option<String>,
    /// Backend reachability
    pub server: ServerStatus,
    /// Should quit
    pub should_quit: bool,
    /// Areas from the last frame
    pub areas: PaneAreas,
    /// Path whose content the viewer last showed
    viewing: Option<String>,
}

impl Default for AppUiState {
    fn default() -> Self {
        Self {
            tree_state: TreeListState::new(),
            viewer_state: ViewerState::new(),
            chat_scroll: ChatScrollState::new(),
            throbber: ThrobberState::default(),
            focused_pane: FocusedPane::default(),
            modal: Modal::None,
            rows: Vec::new(),
            status_message: None,
            server: ServerStatus::Checking,
            should_quit: false,
            areas: PaneAreas::default(),
            viewing: None,
        }
    }
}

/// Main TUI application
pub struct App {
    /// Configuration
    config: Config,
    /// Client state and request dispatch
    shell: Shell,
    /// Backend client (also used for the health check)
    client: Arc<HttpClient>,
    /// Colors
    theme: Theme,
    /// UI state
    ui_state: AppUiState,
    /// Event loop
    event_loop: EventLoop,
    /// Completions from the shell, forwarded once the loop starts
    completions_rx: Option<mpsc::Receiver<Completion>>,
}

impl App {
    /// Create a new application
    pub fn new(config: Config) -> Result<Self> {
        let client = Arc::new(HttpClient::from_config(&config)?);
        let services = Services::new(client.clone(), client.clone());

        let (tx, rx) = mpsc::channel(64);
        let layout = LayoutController::new(config.sidebar_width, config.resize_policy);
        let shell = Shell::new(layout, services, tx);

        Ok(Self {
            config,
            shell,
            client,
            theme: Theme::default(),
            ui_state: AppUiState::default(),
            event_loop: EventLoop::new(),
            completions_rx: Some(rx),
        })
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        // One-time setup
        let tracker = self.shell.layout().tracker().clone();
        self.event_loop.start(self.config.tick_rate(), tracker);
        if let Some(rx) = self.completions_rx.take() {
            self.event_loop.forward_completions(rx);
        }
        self.spawn_health_check();
        self.shell.mount();

        let mut terminal = self.setup_terminal()?;

        info!("Entering main loop");
        let result = self.main_loop(&mut terminal).await;
        info!("Main loop exited with result: {:?}", result.is_ok());

        // Releases pointer tracking if we quit mid-drag
        self.shell.layout_mut().end_resize();

        self.restore_terminal(&mut terminal)?;
        result
    }

    fn spawn_health_check(&self) {
        let client = self.client.clone();
        let sender = self.event_loop.sender();
        tokio::spawn(async move {
            let result = client.health().await;
            let _ = sender.send(AppEvent::Health(result)).await;
        });
    }

    /// Setup terminal for TUI
    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode().map_err(|e| TuiError::InitFailed(e.to_string()))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .map_err(|e| TuiError::InitFailed(e.to_string()))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal =
            Terminal::new(backend).map_err(|e| TuiError::InitFailed(e.to_string()))?;

        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode().map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

        terminal
            .show_cursor()
            .map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

        debug!("Terminal restored");
        Ok(())
    }

    /// Main event loop
    async fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            self.refresh_rows();
            self.sync_viewer();

            terminal
                .draw(|f| self.render(f))
                .map_err(|e| TuiError::RenderError(e.to_string()))?;

            match self.event_loop.next().await {
                Some(AppEvent::Input(input)) => self.handle_input(input),
                Some(AppEvent::Completion(completion)) => self.handle_completion(completion),
                Some(AppEvent::Health(result)) => self.handle_health(result),
                Some(AppEvent::Tick) => {
                    if self.shell.chat().is_awaiting() {
                        self.ui_state.throbber.calc_next();
                    }
                }
                Some(AppEvent::Quit) | None => self.ui_state.should_quit = true,
            }

            if self.ui_state.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Rebuild the visible tree rows from the shell
    fn refresh_rows(&mut self) {
        self.ui_state.rows = self.shell.tree().visible_rows();
        self.ui_state.tree_state.set_item_count(self.ui_state.rows.len());
    }

    /// Reset viewer scroll when a different file is selected
    fn sync_viewer(&mut self) {
        let selected = self.shell.viewer().selected().map(|f| f.path.clone());
        if selected != self.ui_state.viewing {
            self.ui_state.viewer_state.scroll_to_top();
            self.ui_state.viewing = selected;
        }
        if self.ui_state.viewing.is_none() && self.ui_state.focused_pane == FocusedPane::Viewer {
            self.ui_state.focused_pane = FocusedPane::Tree;
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        let is_turn = matches!(completion, Completion::Turn { .. });
        if self.shell.apply(completion) && is_turn {
            self.ui_state.chat_scroll.follow();
        }
    }

    fn handle_health(&mut self, result: std::result::Result<String, ApiError>) {
        self.ui_state.server = match result {
            Ok(message) => {
                info!("Backend reachable: {}", message);
                ServerStatus::Online(message)
            }
            Err(e) => {
                warn!("Backend health check failed: {}", e);
                ServerStatus::Offline(e.to_string())
            }
        };
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Main area on top, status bar on the last row
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let sidebar = self
            .shell
            .layout()
            .sidebar_columns(self.config.cell_width)
            .min(rows[0].width.saturating_sub(1));

        // Sidebar, divider, content
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(sidebar),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(rows[0]);

        // Content: chat, plus the viewer once a file is selected
        let (chat_area, viewer_area) = if self.shell.viewer().selected().is_some() {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(columns[2]);
            (halves[0], Some(halves[1]))
        } else {
            (columns[2], None)
        };

        self.ui_state.areas = PaneAreas {
            tree: columns[0],
            divider: columns[1],
            chat: chat_area,
            viewer: viewer_area,
        };

        self.render_tree(frame, columns[0]);
        self.render_divider(frame, columns[1]);
        self.render_chat(frame, chat_area);
        if let Some(area) = viewer_area {
            self.render_viewer(frame, area);
        }
        self.render_status_bar(frame, rows[1]);
        self.render_modal(frame, size);
    }

    /// Render the workspace tree
    fn render_tree(&mut self, frame: &mut Frame, area: Rect) {
        let is_focused = self.ui_state.focused_pane == FocusedPane::Tree;

        let block = Block::default()
            .title(" Files ")
            .borders(Borders::ALL)
            .border_style(self.theme.border(is_focused));

        let tree_list = TreeList::new(&self.ui_state.rows, &self.theme).block(block);

        frame.render_stateful_widget(tree_list, area, &mut self.ui_state.tree_state.list_state);
    }

    fn render_divider(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::LEFT)
            .border_style(self.theme.divider(self.shell.layout().is_resizing()));
        frame.render_widget(block, area);
    }

    fn render_chat(&self, frame: &mut Frame, area: Rect) {
        let chat = ChatView::new(self.shell.chat(), &self.theme, &self.ui_state.throbber)
            .focused(self.ui_state.focused_pane == FocusedPane::Chat)
            .scroll_back(self.ui_state.chat_scroll.scroll_back);
        frame.render_widget(chat, area);
    }

    /// Render the file viewer
    fn render_viewer(&mut self, frame: &mut Frame, area: Rect) {
        let viewer = self.shell.viewer();
        let (Some(file), Some(content)) = (viewer.selected(), viewer.content()) else {
            return;
        };

        let is_focused = self.ui_state.focused_pane == FocusedPane::Viewer;
        let title = format!(" {} ({}) ", file.name, language_for(&file.name));
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border(is_focused));

        if content.is_loading() {
            let paragraph = Paragraph::new(content.text())
                .style(Style::default().fg(self.theme.text_secondary))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        // Update viewer state with visible area
        let inner_height = area.height.saturating_sub(2);
        self.ui_state.viewer_state.set_content(content.text(), inner_height);

        let text_style = match content {
            FileContent::Failed(_) => Style::default().fg(self.theme.text_error),
            _ => Style::default().fg(self.theme.text_primary),
        };

        let view = FileView::new(content.text())
            .block(block)
            .scroll(self.ui_state.viewer_state.scroll_offset)
            .gutter_style(Style::default().fg(self.theme.text_secondary))
            .text_style(text_style);

        frame.render_widget(view, area);
    }

    /// Render modal overlay
    fn render_modal(&self, frame: &mut Frame, area: Rect) {
        if self.ui_state.modal != Modal::Help {
            return;
        }

        let modal_area = centered_rect(60, 70, area);
        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.modal_info));

        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let help_text = r#"
Navigation:
  Tab             Cycle focus: files, chat, viewer
  j/k, Up/Down    Move in the file tree / scroll
  Enter, Space    Expand directory or open file
  r               Reload expanded directories
  PgUp/PgDn       Page up/down

Layout:
  < / >           Narrow / widen the sidebar
  Mouse drag      Drag the divider to resize

Chat:
  Enter           Send message
  Esc             Leave the chat input
  Ctrl+L          Start a new conversation

Other:
  ?               Show this help
  q, Ctrl+C       Quit

Press any key to close this help.
"#;

        frame.render_widget(Paragraph::new(help_text), inner);
    }

    /// Render status bar
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status = if let Some(ref msg) = self.ui_state.status_message {
            msg.clone()
        } else {
            let server = match &self.ui_state.server {
                ServerStatus::Checking => format!("connecting to {}", self.client.base_url()),
                ServerStatus::Online(_) => format!("online {}", self.client.base_url()),
                ServerStatus::Offline(_) => format!("offline {}", self.client.base_url()),
            };
            format!(
                " {} | session {} | sidebar {} | ? for help | q quit",
                server,
                self.shell.chat().session_id().short(),
                self.shell.layout().sidebar_width(),
            )
        };

        let mut style = self.theme.status_bar();
        if matches!(self.ui_state.server, ServerStatus::Offline(_)) {
            style = style.fg(self.theme.text_error).add_modifier(Modifier::BOLD);
        }

        frame.render_widget(Paragraph::new(Line::from(status)).style(style), area);
    }

    /// Handle input events
    fn handle_input(&mut self, input: InputEvent) {
        match input {
            InputEvent::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return;
                }

                // Any key closes help
                if self.ui_state.modal != Modal::None {
                    self.ui_state.modal = Modal::None;
                    return;
                }

                self.ui_state.status_message = None;
                if let Some(cmd) = UserCommand::from_key(key, self.ui_state.focused_pane) {
                    self.handle_command(cmd);
                }
            }
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
            InputEvent::Resize(_, _) => {
                // Terminal will re-render automatically
            }
        }
    }

    /// Handle a user command
    fn handle_command(&mut self, cmd: UserCommand) {
        match cmd {
            UserCommand::NavigateUp => self.ui_state.tree_state.previous(),
            UserCommand::NavigateDown => self.ui_state.tree_state.next(),
            UserCommand::Activate => {
                if self.ui_state.focused_pane == FocusedPane::Tree {
                    self.activate_selected_row();
                }
            }
            UserCommand::Refresh => {
                self.shell.refresh_tree();
                self.ui_state.status_message = Some("Refreshing files...".to_string());
            }
            UserCommand::TogglePane => {
                let viewer_open = self.shell.viewer().selected().is_some();
                self.ui_state.focused_pane = self.ui_state.focused_pane.next(viewer_open);
            }
            UserCommand::NarrowSidebar => {
                let step = i64::from(self.config.cell_width);
                self.shell.layout_mut().nudge(-step);
            }
            UserCommand::WidenSidebar => {
                let step = i64::from(self.config.cell_width);
                self.shell.layout_mut().nudge(step);
            }
            UserCommand::ClearChat => {
                self.shell.clear_chat();
                self.ui_state.chat_scroll.follow();
                self.ui_state.status_message = Some("Started a new conversation".to_string());
            }
            UserCommand::Submit => {
                if self.shell.submit_input() {
                    self.ui_state.chat_scroll.follow();
                }
            }
            UserCommand::TextInput(c) => self.shell.chat_mut().push_char(c),
            UserCommand::Backspace => self.shell.chat_mut().backspace(),
            UserCommand::ScrollUp => self.scroll_focused(-1),
            UserCommand::ScrollDown => self.scroll_focused(1),
            UserCommand::PageUp => self.page_focused(false),
            UserCommand::PageDown => self.page_focused(true),
            UserCommand::ShowHelp => self.ui_state.modal = Modal::Help,
            UserCommand::Cancel => {
                if self.ui_state.focused_pane == FocusedPane::Chat {
                    self.ui_state.focused_pane = FocusedPane::Tree;
                }
            }
            UserCommand::Quit => self.ui_state.should_quit = true,
        }
    }

    fn activate_selected_row(&mut self) {
        let node = self
            .ui_state
            .tree_state
            .selected()
            .and_then(|idx| self.ui_state.rows.get(idx))
            .and_then(|row| row.node())
            .cloned();

        if let Some(node) = node {
            debug!("Activating {}", node.path);
            self.shell.activate(&node);
        }
    }

    fn scroll_focused(&mut self, direction: i8) {
        match (self.ui_state.focused_pane, direction > 0) {
            (FocusedPane::Chat, false) => self.ui_state.chat_scroll.scroll_up(1),
            (FocusedPane::Chat, true) => self.ui_state.chat_scroll.scroll_down(1),
            (FocusedPane::Viewer, false) => self.ui_state.viewer_state.scroll_up(1),
            (FocusedPane::Viewer, true) => self.ui_state.viewer_state.scroll_down(1),
            (FocusedPane::Tree, false) => self.ui_state.tree_state.previous(),
            (FocusedPane::Tree, true) => self.ui_state.tree_state.next(),
        }
    }

    fn page_focused(&mut self, down: bool) {
        match self.ui_state.focused_pane {
            FocusedPane::Viewer if down => self.ui_state.viewer_state.page_down(),
            FocusedPane::Viewer => self.ui_state.viewer_state.page_up(),
            FocusedPane::Chat => {
                let page = self.ui_state.areas.chat.height.saturating_sub(6).max(1);
                if down {
                    self.ui_state.chat_scroll.scroll_down(page);
                } else {
                    self.ui_state.chat_scroll.scroll_up(page);
                }
            }
            FocusedPane::Tree => {}
        }
    }

    /// Handle mouse input; drag events only arrive while the pointer is tracked
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let areas = self.ui_state.areas;
        let pos = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if areas.divider.contains(pos) {
                    self.shell.layout_mut().begin_resize();
                } else if areas.tree.contains(pos) {
                    self.ui_state.focused_pane = FocusedPane::Tree;
                    self.click_tree_row(areas.tree, pos);
                } else if areas.chat.contains(pos) {
                    self.ui_state.focused_pane = FocusedPane::Chat;
                } else if areas.viewer.is_some_and(|v| v.contains(pos)) {
                    self.ui_state.focused_pane = FocusedPane::Viewer;
                }
            }
            MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                if self.shell.layout().is_resizing() {
                    let columns = u32::from(mouse.column.saturating_sub(areas.tree.x));
                    self.shell
                        .layout_mut()
                        .on_pointer_move(columns.saturating_mul(self.config.cell_width));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.shell.layout_mut().end_resize(),
            MouseEventKind::ScrollUp => {
                if areas.chat.contains(pos) {
                    self.ui_state.chat_scroll.scroll_up(3);
                } else if areas.viewer.is_some_and(|v| v.contains(pos)) {
                    self.ui_state.viewer_state.scroll_up(3);
                }
            }
            MouseEventKind::ScrollDown => {
                if areas.chat.contains(pos) {
                    self.ui_state.chat_scroll.scroll_down(3);
                } else if areas.viewer.is_some_and(|v| v.contains(pos)) {
                    self.ui_state.viewer_state.scroll_down(3);
                }
            }
            _ => {}
        }
    }

    fn click_tree_row(&mut self, tree: Rect, pos: Position) {
        // Rows sit between the top and bottom borders
        if pos.y <= tree.y || pos.y >= tree.bottom().saturating_sub(1) {
            return;
        }
        let index = self.ui_state.tree_state.offset() + usize::from(pos.y - tree.y - 1);
        if index < self.ui_state.rows.len() {
            self.ui_state.tree_state.select(Some(index));
            self.activate_selected_row();
        }
    }
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        App::new(Config::default()).unwrap()
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(50, 50, area);

        // Should be roughly centered
        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.width < area.width);
        assert!(centered.height < area.height);
    }

    #[test]
    fn test_app_ui_state_default() {
        let state = AppUiState::default();
        assert!(state.rows.is_empty());
        assert_eq!(state.focused_pane, FocusedPane::Tree);
        assert_eq!(state.modal, Modal::None);
        assert_eq!(state.server, ServerStatus::Checking);
        assert!(!state.should_quit);
    }

    #[test]
    fn test_focus_cycle_skips_hidden_viewer() {
        assert_eq!(FocusedPane::Tree.next(false), FocusedPane::Chat);
        assert_eq!(FocusedPane::Chat.next(false), FocusedPane::Tree);
        assert_eq!(FocusedPane::Chat.next(true), FocusedPane::Viewer);
        assert_eq!(FocusedPane::Viewer.next(true), FocusedPane::Tree);
    }

    #[test]
    fn test_typing_goes_to_chat_input() {
        let mut app = app();
        app.handle_command(UserCommand::TogglePane);
        assert_eq!(app.ui_state.focused_pane, FocusedPane::Chat);

        app.handle_command(UserCommand::TextInput('h'));
        app.handle_command(UserCommand::TextInput('i'));
        app.handle_command(UserCommand::Backspace);
        assert_eq!(app.shell.chat().input(), "h");
    }

    #[test]
    fn test_keyboard_nudge_is_bounded() {
        let mut app = app();
        let start = app.shell.layout().sidebar_width();
        app.handle_command(UserCommand::WidenSidebar);
        assert_eq!(app.shell.layout().sidebar_width(), start + 8);

        for _ in 0..100 {
            app.handle_command(UserCommand::NarrowSidebar);
        }
        assert_eq!(app.shell.layout().sidebar_width(), crate::layout::MIN_SIDEBAR_WIDTH);
    }

    #[test]
    fn test_divider_drag() {
        let mut app = app();
        app.ui_state.areas = PaneAreas {
            tree: Rect::new(0, 0, 31, 20),
            divider: Rect::new(31, 0, 1, 20),
            chat: Rect::new(32, 0, 48, 20),
            viewer: None,
        };

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 31, 5));
        assert!(app.shell.layout().is_resizing());
        assert!(app.shell.layout().tracker().is_attached());

        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 5));
        assert_eq!(app.shell.layout().sidebar_width(), 320);

        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 40, 5));
        assert!(!app.shell.layout().is_resizing());
        assert!(!app.shell.layout().tracker().is_attached());

        // Moves after release are ignored
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 50, 5));
        assert_eq!(app.shell.layout().sidebar_width(), 320);
    }

    #[test]
    fn test_click_focuses_pane() {
        let mut app = app();
        app.ui_state.areas = PaneAreas {
            tree: Rect::new(0, 0, 31, 20),
            divider: Rect::new(31, 0, 1, 20),
            chat: Rect::new(32, 0, 48, 20),
            viewer: None,
        };

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 50, 5));
        assert_eq!(app.ui_state.focused_pane, FocusedPane::Chat);
    }

    fn file_rows(count: usize) -> Vec<TreeRow> {
        (0..count)
            .map(|i| {
                let name = format!("f{i}.txt");
                TreeRow {
                    depth: 0,
                    kind: crate::workspace::RowKind::Node {
                        node: crate::workspace::TreeNode::file(name.clone(), name),
                        expanded: false,
                        highlighted: false,
                    },
                }
            })
            .collect()
    }

    #[test]
    fn test_click_tree_row_activates_visible_rows_only() {
        // Activating a file spawns its read, so run inside a runtime
        tokio_test::block_on(async {
            let mut app = app();
            app.ui_state.rows = file_rows(5);
            app.ui_state.tree_state.set_item_count(5);
            app.ui_state.tree_state.select(None);
            app.ui_state.areas = PaneAreas {
                tree: Rect::new(0, 0, 31, 5),
                divider: Rect::new(31, 0, 1, 5),
                chat: Rect::new(32, 0, 48, 5),
                viewer: None,
            };

            // Bottom border hides row 3
            app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, 4));
            assert_eq!(app.ui_state.tree_state.selected(), None);
            assert!(app.shell.viewer().selected().is_none());

            // Top border
            app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, 0));
            assert!(app.shell.viewer().selected().is_none());

            // Last inner row
            app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, 3));
            assert_eq!(app.ui_state.focused_pane, FocusedPane::Tree);
            assert_eq!(app.ui_state.tree_state.selected(), Some(2));
            assert_eq!(
                app.shell.viewer().selected().map(|f| f.path.as_str()),
                Some("f2.txt")
            );
        });
    }

    #[test]
    fn test_drag_with_huge_cell_width_clamps() {
        let config = Config {
            cell_width: u32::MAX,
            ..Config::default()
        };
        let mut app = App::new(config).unwrap();
        app.ui_state.areas = PaneAreas {
            tree: Rect::new(0, 0, 31, 20),
            divider: Rect::new(31, 0, 1, 20),
            chat: Rect::new(32, 0, 48, 20),
            viewer: None,
        };

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 31, 5));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 5));
        assert_eq!(app.shell.layout().sidebar_width(), crate::layout::MAX_SIDEBAR_WIDTH);
    }

    #[test]
    fn test_help_modal_closes_on_any_key() {
        let mut app = app();
        app.handle_command(UserCommand::ShowHelp);
        assert_eq!(app.ui_state.modal, Modal::Help);

        let key = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('x'),
            KeyModifiers::NONE,
        );
        app.handle_input(InputEvent::Key(key));
        assert_eq!(app.ui_state.modal, Modal::None);
        assert!(!app.ui_state.should_quit);
    }
}
