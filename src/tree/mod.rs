//! Specification Model
//!
//! The in-memory tree of directories and files a project is made of, and the
//! rules a tree must satisfy before anything is materialized from it.

pub mod node;
pub mod validation;

pub use node::{display_path, resolve_path, Node, NodeKind};
pub use validation::{check_name, validate};

use crate::error::ValidationError;

/// A specification tree that has passed [`validate`].
///
/// Materializers only accept this type, so an invalid tree never reaches a
/// side-effecting backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTree {
    root: Node,
}

impl SpecTree {
    /// The root must be a directory; its children are the project's
    /// top-level entries.
    pub fn new(root: Node) -> Result<Self, ValidationError> {
        if !matches!(root, Node::Directory { .. }) {
            return Err(ValidationError::RootNotDirectory(root.name().to_string()));
        }
        validate(&root)?;
        Ok(Self { root })
    }

    /// Build a validated tree from top-level entries under a synthetic root.
    pub fn from_entries(entries: Vec<Node>) -> Result<Self, ValidationError> {
        Self::new(Node::root(entries))
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn resolve(&self, relative_path: &str) -> Result<&Node, ValidationError> {
        resolve_path(&self.root, relative_path)
    }

    pub fn file_count(&self) -> usize {
        self.root.file_count()
    }

    pub fn directory_count(&self) -> usize {
        self.root.directory_count()
    }

    pub fn into_root(self) -> Node {
        self.root
    }
}
