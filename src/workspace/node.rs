//! Workspace tree node types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Path the listing service treats as the workspace root
pub const ROOT_PATH: &str = ".";

/// Whether a node is a file or a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// One entry of a directory listing
///
/// `path` is workspace-relative and identifies the node for the lifetime of
/// the tree view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

impl TreeNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File,
        }
    }

    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory,
        }
    }

    /// The workspace root
    pub fn root() -> Self {
        Self::directory(ROOT_PATH, ROOT_PATH)
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }
}

/// The file currently shown in the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: String,
}

impl SelectedFile {
    /// Returns `None` for directories, which cannot be selected
    pub fn from_node(node: &TreeNode) -> Option<Self> {
        node.is_file().then(|| Self {
            name: node.name.clone(),
            path: node.path.clone(),
        })
    }
}
