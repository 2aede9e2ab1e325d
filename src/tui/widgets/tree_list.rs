//! Workspace tree list widget
//!
//! Displays the flattened workspace tree with one indent step per ancestor
//! directory, plus placeholder rows for loading, empty and failed listings.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, StatefulWidget},
};

use crate::tui::theme::Theme;
use crate::workspace::{RowKind, TreeRow};

/// Columns of indentation per depth level
const INDENT: usize = 2;

/// Tree list widget for the workspace
pub struct TreeList<'a> {
    /// Rows to display
    rows: &'a [TreeRow],
    /// Theme for styling
    theme: &'a Theme,
    /// Block for borders and title
    block: Option<Block<'a>>,
    /// Style for the cursor row
    highlight_style: Style,
}

impl<'a> TreeList<'a> {
    /// Create a new tree list
    pub fn new(rows: &'a [TreeRow], theme: &'a Theme) -> Self {
        Self {
            rows,
            theme,
            block: None,
            highlight_style: theme.selection().add_modifier(Modifier::BOLD),
        }
    }

    /// Set the block
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Set the highlight style
    pub fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    /// Convert rows to list items
    fn to_list_items(&self) -> Vec<ListItem<'a>> {
        self.rows
            .iter()
            .map(|row| {
                let indent = Span::raw(" ".repeat(row.depth * INDENT));

                let line = match &row.kind {
                    RowKind::Node {
                        node,
                        expanded,
                        highlighted,
                    } => {
                        let (icon, color) = if node.is_dir() {
                            (if *expanded { "📂" } else { "📁" }, self.theme.tree_directory)
                        } else if *highlighted {
                            ("📄", self.theme.tree_highlight)
                        } else {
                            ("📄", self.theme.tree_file)
                        };

                        let mut style = Style::default().fg(color);
                        if *highlighted {
                            style = style.add_modifier(Modifier::BOLD);
                        }

                        Line::from(vec![
                            indent,
                            Span::raw(format!("{} ", icon)),
                            Span::styled(node.name.clone(), style),
                        ])
                    }
                    RowKind::Loading => placeholder(indent, "Loading...", self.theme.text_secondary),
                    RowKind::Empty => placeholder(indent, "No files found", self.theme.text_secondary),
                    RowKind::Failed => placeholder(indent, "Failed to load", self.theme.text_error),
                };

                ListItem::new(line)
            })
            .collect()
    }
}

fn placeholder<'a>(indent: Span<'a>, text: &'a str, color: ratatui::style::Color) -> Line<'a> {
    Line::from(vec![
        indent,
        Span::styled(text, Style::default().fg(color).add_modifier(Modifier::ITALIC)),
    ])
}

impl<'a> StatefulWidget for TreeList<'a> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let items = self.to_list_items();
        let list = List::new(items).highlight_style(self.highlight_style);
        let list = if let Some(block) = self.block {
            list.block(block)
        } else {
            list
        };

        StatefulWidget::render(list, area, buf, state);
    }
}

/// Tree list cursor state
#[derive(Debug, Default)]
pub struct TreeListState {
    /// Inner list state
    pub list_state: ListState,
    /// Total number of rows
    pub item_count: usize,
}

impl TreeListState {
    /// Create a new state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the selected index
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Select a row
    pub fn select(&mut self, index: Option<usize>) {
        self.list_state.select(index);
    }

    /// First row currently scrolled into view
    pub fn offset(&self) -> usize {
        self.list_state.offset()
    }

    /// Select the next row
    pub fn next(&mut self) {
        if self.item_count == 0 {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) if i >= self.item_count - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };

        self.list_state.select(Some(i));
    }

    /// Select the previous row
    pub fn previous(&mut self) {
        if self.item_count == 0 {
            return;
        }

        let i = match self.list_state.selected() {
            Some(0) => self.item_count - 1,
            Some(i) => i - 1,
            None => 0,
        };

        self.list_state.select(Some(i));
    }

    /// Update row count and ensure selection is valid
    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;

        match self.list_state.selected() {
            _ if count == 0 => self.list_state.select(None),
            Some(selected) if selected >= count => self.list_state.select(Some(count - 1)),
            None => self.list_state.select(Some(0)),
            _ => {}
        }
    }
}
