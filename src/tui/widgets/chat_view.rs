//! Chat pane widget
//!
//! Renders the transcript bottom-anchored, a typing indicator while a turn
//! is in flight, and the input box underneath.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::chat::{ConversationSession, Role};
use crate::tui::theme::Theme;

/// Height of the input box including borders
const INPUT_HEIGHT: u16 = 3;

/// Chat widget
pub struct ChatView<'a> {
    session: &'a ConversationSession,
    theme: &'a Theme,
    throbber: &'a ThrobberState,
    focused: bool,
    scroll_back: u16,
}

impl<'a> ChatView<'a> {
    pub fn new(
        session: &'a ConversationSession,
        theme: &'a Theme,
        throbber: &'a ThrobberState,
    ) -> Self {
        Self {
            session,
            theme,
            throbber,
            focused: false,
            scroll_back: 0,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Lines scrolled back from the newest message
    pub fn scroll_back(mut self, lines: u16) -> Self {
        self.scroll_back = lines;
        self
    }

    fn transcript_lines(&self) -> Vec<Line<'a>> {
        let transcript = self.session.transcript();

        if transcript.is_empty() && !self.session.is_awaiting() {
            return vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Start a conversation with the AI assistant",
                    Style::default().fg(self.theme.text_secondary),
                )),
                Line::from(Span::styled(
                    "Try: \"Show me the contents of main.py\"",
                    Style::default()
                        .fg(self.theme.text_secondary)
                        .add_modifier(Modifier::ITALIC),
                )),
            ];
        }

        let mut lines = Vec::new();
        for message in transcript.messages() {
            let color = match message.role {
                Role::User => self.theme.role_user,
                Role::Assistant => self.theme.role_assistant,
            };
            lines.push(Line::from(vec![
                Span::styled(
                    message.role.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", message.sent_at.format("%H:%M")),
                    Style::default().fg(self.theme.text_secondary),
                ),
            ]));
            lines.extend(message.content.lines().map(|l| Line::from(l.to_string())));
            lines.push(Line::from(""));
        }

        if self.session.is_awaiting() {
            let throbber = Throbber::default()
                .label("Assistant is typing...")
                .style(Style::default().fg(self.theme.text_secondary));
            lines.push(throbber.to_line(self.throbber));
        }

        lines
    }
}

/// Rows `lines` occupy once wrapped to `width` columns
fn wrapped_height(lines: &[Line<'_>], width: u16) -> usize {
    let width = usize::from(width.max(1));
    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

impl<'a> Widget for ChatView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(INPUT_HEIGHT)])
            .split(area);

        // Transcript
        let block = Block::default()
            .title(" Chat ")
            .borders(Borders::ALL)
            .border_style(self.theme.border(self.focused));
        let inner = block.inner(chunks[0]);

        let lines = self.transcript_lines();
        let total = wrapped_height(&lines, inner.width);
        let bottom = total.saturating_sub(usize::from(inner.height));
        let offset = bottom.saturating_sub(usize::from(self.scroll_back));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
            .render(chunks[0], buf);

        // Input
        let enabled = self.session.input_enabled();
        let title = format!(" Message ({}) ", self.session.session_id().short());
        let input_block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border(self.focused && enabled));

        let input = if enabled {
            let cursor = if self.focused { "_" } else { "" };
            Line::from(vec![
                Span::styled("> ", Style::default().fg(self.theme.text_accent)),
                Span::raw(format!("{}{}", self.session.input(), cursor)),
            ])
        } else {
            Line::from(Span::styled(
                "Waiting for response...",
                Style::default()
                    .fg(self.theme.text_secondary)
                    .add_modifier(Modifier::DIM),
            ))
        };

        Paragraph::new(input).block(input_block).render(chunks[1], buf);
    }
}

/// Scroll position of the transcript, counted from the bottom
#[derive(Debug, Default)]
pub struct ChatScrollState {
    pub scroll_back: u16,
}

impl ChatScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_up(&mut self, n: u16) {
        self.scroll_back = self.scroll_back.saturating_add(n);
    }

    pub fn scroll_down(&mut self, n: u16) {
        self.scroll_back = self.scroll_back.saturating_sub(n);
    }

    /// Jump back to the newest message
    pub fn follow(&mut self) {
        self.scroll_back = 0;
    }
}
