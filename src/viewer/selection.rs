//! Selected file and its content
//!
//! Content is fetched fresh on every selection. Each read is tagged with a
//! token; only the read belonging to the latest selection may fill the
//! viewer, whatever order the responses arrive in.

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::workspace::SelectedFile;

/// A file read the caller should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    pub path: String,
    pub token: u64,
}

/// Content pane payload for the selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Loading,
    Loaded(String),
    /// Inline error text shown in place of content
    Failed(String),
}

impl FileContent {
    /// Text to display
    pub fn text(&self) -> &str {
        match self {
            Self::Loading => "Loading...",
            Self::Loaded(text) | Self::Failed(text) => text,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// The single live SelectedFile/FileContent pair
#[derive(Debug, Default)]
pub struct FileSelection {
    current: Option<(SelectedFile, FileContent)>,
    token: u64,
}

impl FileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.current.as_ref().map(|(file, _)| file)
    }

    pub fn content(&self) -> Option<&FileContent> {
        self.current.as_ref().map(|(_, content)| content)
    }

    /// Replace the selection; the previous file's content is dropped at once
    pub fn select(&mut self, file: SelectedFile) -> ReadRequest {
        self.token += 1;
        let request = ReadRequest {
            path: file.path.clone(),
            token: self.token,
        };
        debug!(path = %file.path, token = self.token, "File selected");
        self.current = Some((file, FileContent::Loading));
        request
    }

    /// Apply a finished read. Returns false if it belongs to a superseded selection.
    pub fn apply_read(&mut self, request: &ReadRequest, result: Result<String, ApiError>) -> bool {
        let Some((file, content)) = self.current.as_mut() else {
            return false;
        };

        if request.token != self.token || request.path != file.path {
            debug!(path = %request.path, token = request.token, "Discarding stale file read");
            return false;
        }

        *content = match result {
            Ok(text) => FileContent::Loaded(text),
            Err(e) => {
                warn!(path = %request.path, "Failed to read file: {}", e);
                FileContent::Failed(format!("Error loading file: {e}"))
            }
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> SelectedFile {
        SelectedFile {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_select_then_load() {
        let mut selection = FileSelection::new();
        let request = selection.select(file("main.py"));
        assert_eq!(selection.content(), Some(&FileContent::Loading));

        assert!(selection.apply_read(&request, Ok("print('hi')".to_string())));
        assert_eq!(selection.content().map(FileContent::text), Some("print('hi')"));
    }

    #[test]
    fn test_late_response_for_superseded_selection_dropped() {
        let mut selection = FileSelection::new();
        let a = selection.select(file("a.txt"));
        let b = selection.select(file("b.txt"));

        assert!(selection.apply_read(&b, Ok("B".to_string())));
        assert!(!selection.apply_read(&a, Ok("A".to_string())));

        assert_eq!(selection.selected().map(|f| f.path.as_str()), Some("b.txt"));
        assert_eq!(selection.content(), Some(&FileContent::Loaded("B".to_string())));
    }

    #[test]
    fn test_reselecting_same_path_uses_latest_token() {
        let mut selection = FileSelection::new();
        let first = selection.select(file("a.txt"));
        let second = selection.select(file("a.txt"));

        assert!(!selection.apply_read(&first, Ok("old".to_string())));
        assert!(selection.apply_read(&second, Ok("new".to_string())));
        assert_eq!(selection.content().map(FileContent::text), Some("new"));
    }

    #[test]
    fn test_failure_shows_inline_error() {
        let mut selection = FileSelection::new();
        let request = selection.select(file("gone.txt"));
        selection.apply_read(
            &request,
            Err(ApiError::Server { status: 404, detail: "File not found: gone.txt".to_string() }),
        );

        let text = selection.content().map(FileContent::text).unwrap();
        assert!(text.starts_with("Error loading file: "));
        assert!(text.contains("gone.txt"));
    }
}
