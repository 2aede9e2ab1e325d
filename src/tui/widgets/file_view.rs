//! File viewer widget
//!
//! Displays the selected file's raw text with a line-number gutter and
//! scrolling support.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// Viewer widget for file content
pub struct FileView<'a> {
    /// Content to display
    content: &'a str,
    /// Block for borders and title
    block: Option<Block<'a>>,
    /// Scroll offset
    scroll: u16,
    /// Style for the line-number gutter
    gutter_style: Style,
    /// Style for the text itself
    text_style: Style,
}

impl<'a> FileView<'a> {
    /// Create a new viewer widget
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            block: None,
            scroll: 0,
            gutter_style: Style::default(),
            text_style: Style::default(),
        }
    }

    /// Set the block
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Set the scroll offset
    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    /// Set the gutter style
    pub fn gutter_style(mut self, style: Style) -> Self {
        self.gutter_style = style;
        self
    }

    /// Set the text style (e.g. for inline errors)
    pub fn text_style(mut self, style: Style) -> Self {
        self.text_style = style;
        self
    }
}

impl<'a> Widget for FileView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let total = self.content.lines().count().max(1);
        let width = total.to_string().len();

        // Tabs would otherwise render as a single cell
        let lines: Vec<Line<'_>> = self
            .content
            .lines()
            .enumerate()
            .map(|(i, line)| {
                Line::from(vec![
                    Span::styled(format!("{:>width$} │ ", i + 1), self.gutter_style),
                    Span::styled(line.replace('\t', "    "), self.text_style),
                ])
            })
            .collect();

        // No .wrap(); long lines are clipped
        let paragraph = Paragraph::new(lines).scroll((self.scroll, 0));

        let paragraph = if let Some(block) = self.block {
            paragraph.block(block)
        } else {
            paragraph
        };

        paragraph.render(area, buf);
    }
}

/// Viewer state for scrolling
#[derive(Debug, Default)]
pub struct ViewerState {
    /// Current scroll offset (lines from top)
    pub scroll_offset: u16,
    /// Total number of lines in content
    pub total_lines: usize,
    /// Visible height
    pub visible_height: u16,
}

impl ViewerState {
    /// Create a new state
    pub fn new() -> Self {
        Self::default()
    }

    /// Update content info
    pub fn set_content(&mut self, content: &str, visible_height: u16) {
        self.total_lines = content.lines().count();
        self.visible_height = visible_height;

        // Ensure scroll is still valid
        self.clamp_scroll();
    }

    /// Scroll up by n lines
    pub fn scroll_up(&mut self, n: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    /// Scroll down by n lines
    pub fn scroll_down(&mut self, n: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(n);
        self.clamp_scroll();
    }

    /// Page up
    pub fn page_up(&mut self) {
        let page = self.visible_height.saturating_sub(2);
        self.scroll_up(page);
    }

    /// Page down
    pub fn page_down(&mut self) {
        let page = self.visible_height.saturating_sub(2);
        self.scroll_down(page);
    }

    /// Scroll to top
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    fn max_scroll(&self) -> u16 {
        let max = self.total_lines.saturating_sub(self.visible_height as usize);
        u16::try_from(max).unwrap_or(u16::MAX)
    }

    /// Ensure scroll offset is within valid range
    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Check if we can scroll up
    pub fn can_scroll_up(&self) -> bool {
        self.scroll_offset > 0
    }

    /// Check if we can scroll down
    pub fn can_scroll_down(&self) -> bool {
        self.scroll_offset < self.max_scroll()
    }
}
