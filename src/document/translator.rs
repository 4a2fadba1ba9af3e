//! Translation of raw upstream input into specification documents.
//!
//! The domain-specific field mapping (for example from an XML project
//! description) lives outside this crate behind [`SpecTranslator`].

use super::SpecificationDocument;
use crate::error::ParseError;

/// Produces a specification document from raw input.
pub trait SpecTranslator: Send + Sync {
    fn translate(&self, raw: &str) -> Result<SpecificationDocument, ParseError>;
}

/// Accepts input that is already a YAML (or JSON) specification document.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlTranslator;

impl SpecTranslator for YamlTranslator {
    fn translate(&self, raw: &str) -> Result<SpecificationDocument, ParseError> {
        let document = SpecificationDocument::from_yaml(raw)?;
        match &document.structure {
            serde_yaml::Value::Null => Err(ParseError::MissingStructure),
            serde_yaml::Value::Sequence(_) => Ok(document),
            _ => Err(ParseError::InvalidStructure),
        }
    }
}
