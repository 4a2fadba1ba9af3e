//! Specification tree validation.

use super::node::{display_path, Node};
use crate::error::{NameRule, ValidationError};
use std::collections::HashSet;

/// Validate a specification tree.
///
/// Checks name constraints and sibling uniqueness depth-first and stops at
/// the first offending node. The name of `root` itself is a label, not a
/// path segment, and is not checked.
pub fn validate(root: &Node) -> Result<(), ValidationError> {
    let mut segments = Vec::new();
    validate_children(root, &mut segments)
}

fn validate_children<'a>(
    node: &'a Node,
    segments: &mut Vec<&'a str>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for child in node.children() {
        segments.push(child.name());
        check_name(child.name()).map_err(|rule| ValidationError::InvalidName {
            path: display_path(segments.as_slice()),
            rule,
        })?;
        if !seen.insert(child.name()) {
            return Err(ValidationError::DuplicateName {
                path: display_path(segments.as_slice()),
                name: child.name().to_string(),
            });
        }
        validate_children(child, segments)?;
        segments.pop();
    }
    Ok(())
}

/// Check a single node name against the path-safety rules.
pub fn check_name(name: &str) -> Result<(), NameRule> {
    if name.is_empty() {
        return Err(NameRule::Empty);
    }
    if name.contains('/') || name.contains('\\') {
        return Err(NameRule::PathSeparator);
    }
    if name.contains('\0') {
        return Err(NameRule::NulByte);
    }
    if name == "." || name == ".." {
        return Err(NameRule::RelativeSegment);
    }
    Ok(())
}
