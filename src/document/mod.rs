//! Specification Documents
//!
//! The persisted, serialized description of a project structure, produced
//! upstream from raw input and keyed by the fingerprint of that input.
//! Documents are immutable once stored.

pub mod fingerprint;
pub mod loader;
pub mod translator;

pub use fingerprint::fingerprint;
pub use loader::{load_document, LoadMode, LoadReport, LoadedSpec, SkippedDescriptor};
pub use translator::{SpecTranslator, YamlTranslator};

use crate::error::ParseError;
use crate::tree::check_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Specification document as persisted.
///
/// `structure` is kept as raw YAML so the loader can skip malformed
/// descriptors individually instead of rejecting the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub structure: serde_yaml::Value,

    /// Other project metadata, preserved verbatim.
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_yaml::Value>,
}

impl SpecificationDocument {
    pub fn from_yaml(raw: &str) -> Result<Self, ParseError> {
        serde_yaml::from_str(raw).map_err(|e| ParseError::Syntax(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Directory name to materialize into locally: `output_dir`, then
    /// `project_name`, when either is a single safe path segment.
    pub fn local_dir_name(&self) -> Option<&str> {
        [self.output_dir.as_deref(), self.project_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|name| check_name(name).is_ok())
    }
}
