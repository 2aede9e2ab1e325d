//! Lazily populated workspace tree
//!
//! Directory contents are fetched on first expansion and cached per refresh
//! generation. The tree never performs I/O itself: operations return
//! [`ListingRequest`]s for the caller to execute, and results come back
//! through [`WorkspaceTree::apply_listing`] tagged with the generation they
//! were issued under.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, warn};

use super::node::{SelectedFile, TreeNode, ROOT_PATH};
use crate::error::ApiError;

/// A directory listing the caller should fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub path: String,
    pub generation: u64,
}

/// Load state of one directory in the current generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirState {
    Loading,
    Loaded(Vec<TreeNode>),
    /// The listing call failed; shown as an empty directory flagged as failed
    Failed,
}

/// Result of activating a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeAction {
    /// Directory toggled and needs its listing fetched
    Fetch(ListingRequest),
    /// Directory toggled, nothing to fetch
    Toggled,
    /// File selected; forward to the viewer flow
    Select(SelectedFile),
}

/// What a visible row shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Node {
        node: TreeNode,
        expanded: bool,
        highlighted: bool,
    },
    Loading,
    Empty,
    Failed,
}

/// One line of the flattened tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    /// Number of ancestor directories below the displayed root
    pub depth: usize,
    pub kind: RowKind,
}

impl TreeRow {
    pub fn node(&self) -> Option<&TreeNode> {
        match &self.kind {
            RowKind::Node { node, .. } => Some(node),
            _ => None,
        }
    }
}

/// Directory paths currently shown expanded
///
/// Ordered so that refresh issues requests deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionSet(BTreeSet<String>);

impl ExpansionSet {
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    fn insert(&mut self, path: &str) -> bool {
        self.0.insert(path.to_string())
    }

    fn remove(&mut self, path: &str) -> bool {
        self.0.remove(path)
    }
}

/// Expand/collapse state and listing cache of the workspace
#[derive(Debug)]
pub struct WorkspaceTree {
    expanded: ExpansionSet,
    directories: HashMap<String, DirState>,
    generation: u64,
    highlighted: Option<String>,
}

impl Default for WorkspaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceTree {
    /// Create a tree whose root is expanded but not yet fetched
    pub fn new() -> Self {
        let mut expanded = ExpansionSet::default();
        expanded.insert(ROOT_PATH);
        Self {
            expanded,
            directories: HashMap::new(),
            generation: 0,
            highlighted: None,
        }
    }

    /// Initial load of the root listing
    pub fn mount(&mut self) -> Option<ListingRequest> {
        self.request_if_needed(ROOT_PATH)
    }

    pub fn expansion(&self) -> &ExpansionSet {
        &self.expanded
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn dir_state(&self, path: &str) -> Option<&DirState> {
        self.directories.get(path)
    }

    /// Children of a loaded directory; empty for failed or unfetched ones
    pub fn children(&self, path: &str) -> &[TreeNode] {
        match self.directories.get(path) {
            Some(DirState::Loaded(children)) => children,
            _ => &[],
        }
    }

    /// Toggle a directory's expansion. Files are ignored.
    ///
    /// Returns a listing request only when the directory is being expanded
    /// and has neither been loaded nor requested in this generation.
    pub fn toggle(&mut self, node: &TreeNode) -> Option<ListingRequest> {
        if !node.is_dir() {
            return None;
        }

        if self.expanded.remove(&node.path) {
            debug!(path = %node.path, "Collapsed directory");
            return None;
        }

        self.expanded.insert(&node.path);
        debug!(path = %node.path, "Expanded directory");
        self.request_if_needed(&node.path)
    }

    /// Highlight a file and hand it to the consumer
    pub fn select_file(&mut self, node: &TreeNode) -> Option<SelectedFile> {
        let selected = SelectedFile::from_node(node)?;
        self.highlighted = Some(selected.path.clone());
        Some(selected)
    }

    /// Toggle a directory or select a file
    pub fn activate(&mut self, node: &TreeNode) -> TreeAction {
        if node.is_dir() {
            match self.toggle(node) {
                Some(request) => TreeAction::Fetch(request),
                None => TreeAction::Toggled,
            }
        } else {
            match self.select_file(node) {
                Some(selected) => TreeAction::Select(selected),
                None => TreeAction::Toggled,
            }
        }
    }

    /// Invalidate every loaded listing and re-request all expanded directories
    ///
    /// Expansion membership is left untouched.
    pub fn refresh(&mut self) -> Vec<ListingRequest> {
        self.generation += 1;
        self.directories.clear();
        debug!(generation = self.generation, "Workspace tree invalidated");

        let paths: Vec<String> = self.expanded.iter().map(str::to_string).collect();
        paths
            .iter()
            .filter_map(|path| self.request_if_needed(path))
            .collect()
    }

    /// Apply a finished listing. Returns false if it was stale and dropped.
    pub fn apply_listing(
        &mut self,
        request: &ListingRequest,
        result: Result<Vec<TreeNode>, ApiError>,
    ) -> bool {
        if request.generation != self.generation {
            debug!(
                path = %request.path,
                generation = request.generation,
                current = self.generation,
                "Discarding stale listing"
            );
            return false;
        }

        let state = match result {
            Ok(children) => DirState::Loaded(children),
            Err(e) => {
                warn!(path = %request.path, "Failed to list directory: {}", e);
                DirState::Failed
            }
        };
        self.directories.insert(request.path.clone(), state);
        true
    }

    /// Flatten the visible part of the tree, root-down, in server order
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let mut visited = HashSet::new();
        self.push_rows(ROOT_PATH, 0, &mut rows, &mut visited);
        rows
    }

    fn push_rows<'a>(
        &'a self,
        dir: &'a str,
        depth: usize,
        rows: &mut Vec<TreeRow>,
        visited: &mut HashSet<&'a str>,
    ) {
        // A listing that contains one of its ancestors would otherwise recurse forever
        if !visited.insert(dir) {
            return;
        }

        match self.directories.get(dir) {
            None | Some(DirState::Loading) => rows.push(TreeRow {
                depth,
                kind: RowKind::Loading,
            }),
            Some(DirState::Failed) => rows.push(TreeRow {
                depth,
                kind: RowKind::Failed,
            }),
            Some(DirState::Loaded(children)) if children.is_empty() => rows.push(TreeRow {
                depth,
                kind: RowKind::Empty,
            }),
            Some(DirState::Loaded(children)) => {
                for child in children {
                    let expanded = child.is_dir() && self.expanded.contains(&child.path);
                    rows.push(TreeRow {
                        depth,
                        kind: RowKind::Node {
                            node: child.clone(),
                            expanded,
                            highlighted: self.highlighted.as_deref() == Some(child.path.as_str()),
                        },
                    });
                    if expanded {
                        self.push_rows(&child.path, depth + 1, rows, visited);
                    }
                }
            }
        }
    }

    fn request_if_needed(&mut self, path: &str) -> Option<ListingRequest> {
        if self.directories.contains_key(path) {
            return None;
        }

        self.directories.insert(path.to_string(), DirState::Loading);
        Some(ListingRequest {
            path: path.to_string(),
            generation: self.generation,
        })
    }
}
