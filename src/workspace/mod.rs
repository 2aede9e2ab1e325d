//! Remote workspace navigation
//!
//! - `TreeNode` - one listing entry (file or directory)
//! - `WorkspaceTree` - expansion set, lazy listing cache and selection

mod node;
mod tree;

pub use node::*;
pub use tree::*;
