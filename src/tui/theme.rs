//! TUI Theme configuration
//!
//! Centralized theme system for consistent styling across the UI.
//! Supports multiple color depths for terminal compatibility.

use ratatui::style::{Color, Style};

/// Terminal color capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Basic 16 ANSI colors (maximum compatibility)
    Basic,
    /// 256 color palette
    #[default]
    Indexed,
    /// True color (24-bit RGB)
    TrueColor,
}

impl ColorMode {
    /// Detect the best color mode for the current terminal
    pub fn detect() -> Self {
        if let Ok(colorterm) = std::env::var("COLORTERM") {
            if colorterm == "truecolor" || colorterm == "24bit" {
                return Self::TrueColor;
            }
        }

        if let Ok(term) = std::env::var("TERM") {
            if term.contains("kitty") || term.contains("alacritty") {
                return Self::TrueColor;
            }
            if term.contains("256color") {
                return Self::Indexed;
            }
        }

        Self::Basic
    }
}

/// Theme configuration for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    // Pane borders
    pub border_focused: Color,
    pub border_unfocused: Color,

    // Divider between sidebar and content
    pub divider: Color,
    pub divider_active: Color,

    // Selection
    pub selection_bg: Color,
    pub selection_fg: Option<Color>,

    // Workspace tree
    pub tree_directory: Color,
    pub tree_file: Color,
    pub tree_highlight: Color,

    // Chat
    pub role_user: Color,
    pub role_assistant: Color,

    // Text
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_accent: Color,
    pub text_error: Color,

    // Modal borders
    pub modal_info: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_color_mode(ColorMode::detect())
    }
}

impl Theme {
    /// Create a theme for the specified color mode
    pub fn for_color_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Basic => Self::basic(),
            ColorMode::Indexed => Self::indexed(),
            ColorMode::TrueColor => Self::truecolor(),
        }
    }

    /// Basic 16-color theme (maximum compatibility)
    pub fn basic() -> Self {
        Self {
            border_focused: Color::Cyan,
            border_unfocused: Color::DarkGray,

            divider: Color::DarkGray,
            divider_active: Color::Cyan,

            selection_bg: Color::Blue,
            selection_fg: Some(Color::White),

            tree_directory: Color::Blue,
            tree_file: Color::Reset,
            tree_highlight: Color::Yellow,

            role_user: Color::Green,
            role_assistant: Color::Magenta,

            text_primary: Color::Reset,
            text_secondary: Color::DarkGray,
            text_accent: Color::Blue,
            text_error: Color::Red,

            modal_info: Color::Cyan,

            status_bar_bg: Color::Blue,
            status_bar_fg: Color::White,
        }
    }

    /// 256-color theme
    pub fn indexed() -> Self {
        Self {
            border_focused: Color::Indexed(117),  // Pastel sky blue
            border_unfocused: Color::Indexed(243),

            divider: Color::Indexed(240),
            divider_active: Color::Indexed(117),

            selection_bg: Color::Indexed(60),     // Muted purple-blue
            selection_fg: Some(Color::Indexed(255)),

            tree_directory: Color::Indexed(147),  // Pastel lavender
            tree_file: Color::Reset,
            tree_highlight: Color::Indexed(222),  // Pastel peach

            role_user: Color::Indexed(156),       // Pastel mint
            role_assistant: Color::Indexed(183),  // Pastel orchid

            text_primary: Color::Reset,
            text_secondary: Color::Indexed(250),
            text_accent: Color::Indexed(147),
            text_error: Color::Indexed(210),      // Pastel coral

            modal_info: Color::Indexed(117),

            status_bar_bg: Color::Indexed(236),
            status_bar_fg: Color::Indexed(252),
        }
    }

    /// True color theme
    pub fn truecolor() -> Self {
        Self {
            border_focused: Color::Rgb(137, 180, 250),   // Pastel sky blue
            border_unfocused: Color::Rgb(88, 91, 112),

            divider: Color::Rgb(69, 71, 90),
            divider_active: Color::Rgb(137, 180, 250),

            selection_bg: Color::Rgb(69, 71, 90),
            selection_fg: Some(Color::Rgb(245, 245, 250)),

            tree_directory: Color::Rgb(180, 190, 254),   // Pastel periwinkle
            tree_file: Color::Rgb(205, 214, 244),
            tree_highlight: Color::Rgb(249, 226, 175),   // Pastel peach

            role_user: Color::Rgb(166, 227, 161),        // Pastel mint
            role_assistant: Color::Rgb(203, 166, 247),   // Pastel mauve

            text_primary: Color::Rgb(245, 245, 250),
            text_secondary: Color::Rgb(166, 173, 200),
            text_accent: Color::Rgb(180, 190, 254),
            text_error: Color::Rgb(243, 139, 168),       // Pastel rose

            modal_info: Color::Rgb(137, 180, 250),

            status_bar_bg: Color::Rgb(49, 50, 68),
            status_bar_fg: Color::Rgb(205, 214, 244),
        }
    }

    /// Border style for a pane
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border_unfocused)
        }
    }

    /// Style for selected items
    pub fn selection(&self) -> Style {
        let style = Style::default().bg(self.selection_bg);
        match self.selection_fg {
            Some(fg) => style.fg(fg),
            None => style,
        }
    }

    /// Style for the pane divider
    pub fn divider(&self, dragging: bool) -> Style {
        Style::default().fg(if dragging { self.divider_active } else { self.divider })
    }

    /// Style for status bar
    pub fn status_bar(&self) -> Style {
        Style::default().bg(self.status_bar_bg).fg(self.status_bar_fg)
    }
}
