//! Pre-order traversal shared by the materializers.
//!
//! Backends consume the same sequence of steps and differ only in how they
//! turn a step's name segments into a path and what side effect they run.

use crate::tree::{Node, SpecTree};

/// One node visited by [`Walk`], with the names of its ancestors and itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<'a> {
    Directory { segments: Vec<&'a str>, empty: bool },
    File { segments: Vec<&'a str>, content: &'a str },
}

impl<'a> Step<'a> {
    pub fn segments(&self) -> &[&'a str] {
        match self {
            Step::Directory { segments, .. } | Step::File { segments, .. } => segments,
        }
    }

    /// Forward-slash path relative to the materialization root.
    pub fn relative_path(&self) -> String {
        self.segments().join("/")
    }
}

/// Depth-first pre-order walk over a validated tree. The root is not yielded.
pub struct Walk<'a> {
    stack: Vec<(Vec<&'a str>, &'a Node)>,
}

impl<'a> Walk<'a> {
    pub fn new(tree: &'a SpecTree) -> Self {
        let mut walk = Walk { stack: Vec::new() };
        walk.push_children(&[], tree.root());
        walk
    }

    fn push_children(&mut self, parent: &[&'a str], node: &'a Node) {
        for child in node.children().iter().rev() {
            let mut segments = parent.to_vec();
            segments.push(child.name());
            self.stack.push((segments, child));
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Step<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (segments, node) = self.stack.pop()?;
        match node {
            Node::Directory { children, .. } => {
                self.push_children(&segments, node);
                Some(Step::Directory {
                    segments,
                    empty: children.is_empty(),
                })
            }
            Node::File { content, .. } => Some(Step::File { segments, content }),
        }
    }
}
