//! Specification Loader
//!
//! Converts the raw `structure` of a specification document into a validated
//! [`SpecTree`]. Descriptor-level problems are either skipped with a warning
//! (permissive) or fail the whole load (strict). Name rules and sibling
//! uniqueness are checked afterwards on the remaining tree and are always
//! fatal.

use super::SpecificationDocument;
use crate::error::{ApiError, ParseError};
use crate::tree::{Node, SpecTree};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// How malformed descriptors are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Skip malformed descriptors and continue with their siblings.
    #[default]
    Permissive,
    /// Fail on the first malformed descriptor.
    Strict,
}

/// A descriptor dropped by a permissive load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDescriptor {
    pub location: String,
    pub error: ParseError,
}

/// Diagnostics collected while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub skipped: Vec<SkippedDescriptor>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct LoadedSpec {
    pub tree: SpecTree,
    pub report: LoadReport,
}

/// Load and validate the structure of a specification document.
pub fn load_document(
    document: &SpecificationDocument,
    mode: LoadMode,
) -> Result<LoadedSpec, ApiError> {
    load_structure(&document.structure, mode)
}

/// Load and validate a raw `structure` value.
pub fn load_structure(structure: &Value, mode: LoadMode) -> Result<LoadedSpec, ApiError> {
    let items = match structure {
        Value::Null => return Err(ParseError::MissingStructure.into()),
        Value::Sequence(items) => items,
        _ => return Err(ParseError::InvalidStructure.into()),
    };

    let mut loader = Loader {
        mode,
        skipped: Vec::new(),
    };
    let entries = loader.convert_sequence(items, "structure")?;
    let tree = SpecTree::from_entries(entries)?;

    tracing::debug!(
        files = tree.file_count(),
        directories = tree.directory_count(),
        skipped = loader.skipped.len(),
        "Loaded specification tree"
    );

    Ok(LoadedSpec {
        tree,
        report: LoadReport {
            skipped: loader.skipped,
        },
    })
}

struct Loader {
    mode: LoadMode,
    skipped: Vec<SkippedDescriptor>,
}

impl Loader {
    fn convert_sequence(&mut self, items: &[Value], parent: &str) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let location = format!("{}[{}]", parent, index);
            match self.convert(item, &location) {
                Ok(node) => nodes.push(node),
                Err(error) if self.mode == LoadMode::Permissive => {
                    tracing::warn!(%location, %error, "Skipping malformed descriptor");
                    self.skipped.push(SkippedDescriptor { location, error });
                }
                Err(error) => return Err(error),
            }
        }
        Ok(nodes)
    }

    fn convert(&mut self, item: &Value, location: &str) -> Result<Node, ParseError> {
        if !item.is_mapping() {
            return Err(ParseError::NotAMapping {
                location: location.to_string(),
            });
        }

        let name = match item.get("name").and_then(scalar_text) {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(ParseError::MissingName {
                    location: location.to_string(),
                })
            }
        };

        let kind = match item.get("type") {
            None | Some(Value::Null) => {
                return Err(ParseError::MissingType {
                    location: location.to_string(),
                    name,
                })
            }
            Some(value) => scalar_text(value).unwrap_or_else(|| render(value)),
        };

        let content = item.get("content").filter(|v| !v.is_null());
        let children = item.get("children").filter(|v| !v.is_null());

        match kind.as_str() {
            "directory" => {
                if content.is_some() {
                    return Err(ParseError::ContentOnDirectory {
                        location: location.to_string(),
                        name,
                    });
                }
                let children = match children {
                    None => Vec::new(),
                    Some(Value::Sequence(items)) => {
                        self.convert_sequence(items, &format!("{}.children", location))?
                    }
                    Some(_) => {
                        return Err(ParseError::InvalidChildren {
                            location: location.to_string(),
                            name,
                        })
                    }
                };
                Ok(Node::Directory { name, children })
            }
            "file" => {
                if children.is_some() {
                    return Err(ParseError::ChildrenOnFile {
                        location: location.to_string(),
                        name,
                    });
                }
                let content = match content {
                    None => String::new(),
                    Some(value) => scalar_text(value).ok_or_else(|| ParseError::InvalidContent {
                        location: location.to_string(),
                        name: name.clone(),
                    })?,
                };
                Ok(Node::File { name, content })
            }
            _ => Err(ParseError::InvalidType {
                location: location.to_string(),
                name,
                found: kind,
            }),
        }
    }
}

/// Textual form of a YAML scalar; `None` for null, sequences and mappings.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn render(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| "<unprintable>".to_string())
}
