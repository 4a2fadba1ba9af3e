//! Specification node types and path resolution

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Kind of a specification node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Directory => "directory",
            NodeKind::File => "file",
        }
    }
}

/// One directory or file entry of a project structure.
///
/// A file never has children and a directory never has content; the enum
/// makes the mismatched shapes unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Directory {
        name: String,
        #[serde(default)]
        children: Vec<Node>,
    },
    File {
        name: String,
        #[serde(default)]
        content: String,
    },
}

impl Node {
    /// Synthetic root (named `""`) holding the top-level entries.
    pub fn root(children: Vec<Node>) -> Self {
        Node::Directory {
            name: String::new(),
            children,
        }
    }

    pub fn directory(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Directory {
            name: name.into(),
            children,
        }
    }

    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Node::File {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Directory { name, .. } | Node::File { name, .. } => name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Directory { .. } => NodeKind::Directory,
            Node::File { .. } => NodeKind::File,
        }
    }

    /// Children of a directory; empty for files.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Directory { children, .. } => children,
            Node::File { .. } => &[],
        }
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children().iter().find(|c| c.name() == name)
    }

    /// Number of file nodes in this subtree.
    pub fn file_count(&self) -> usize {
        match self {
            Node::File { .. } => 1,
            Node::Directory { children, .. } => children.iter().map(Node::file_count).sum(),
        }
    }

    /// Number of directory nodes in this subtree, excluding `self`.
    pub fn directory_count(&self) -> usize {
        self.children()
            .iter()
            .map(|c| match c {
                Node::Directory { .. } => 1 + c.directory_count(),
                Node::File { .. } => 0,
            })
            .sum()
    }
}

/// Join ancestor names into a display path. The root renders as `.`.
pub fn display_path(segments: &[&str]) -> String {
    if segments.is_empty() {
        return ".".to_string();
    }
    segments.join("/")
}

/// Walk child-name segments from `root`.
///
/// Segments are separated by `/`; empty segments are ignored, so `""`
/// resolves to `root` itself.
pub fn resolve_path<'a>(root: &'a Node, relative_path: &str) -> Result<&'a Node, ValidationError> {
    let mut current = root;
    for segment in relative_path.split('/').filter(|s| !s.is_empty()) {
        current = current
            .child(segment)
            .ok_or_else(|| ValidationError::NotFound(relative_path.to_string()))?;
    }
    Ok(current)
}
