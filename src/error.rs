//! Error types for the scaffold pipeline.
//!
//! Each stage owns one error enum. `ApiError` is the umbrella returned by
//! entry points; `ApiError::kind` gives callers a stable category string.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed specification tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid name at {path}: {rule}")]
    InvalidName { path: String, rule: NameRule },

    #[error("duplicate name at {path}: '{name}' already exists among its siblings")]
    DuplicateName { path: String, name: String },

    #[error("path not found in specification: {0}")]
    NotFound(String),

    #[error("specification root '{0}' must be a directory")]
    RootNotDirectory(String),
}

/// Name constraint violated by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    Empty,
    PathSeparator,
    NulByte,
    RelativeSegment,
}

impl std::fmt::Display for NameRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            NameRule::Empty => "name must not be empty",
            NameRule::PathSeparator => "name must not contain a path separator",
            NameRule::NulByte => "name must not contain a NUL byte",
            NameRule::RelativeSegment => "name must not be '.' or '..'",
        };
        f.write_str(text)
    }
}

/// Malformed specification document or descriptor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("document is not valid YAML: {0}")]
    Syntax(String),

    #[error("document has no 'structure' field")]
    MissingStructure,

    #[error("'structure' must be a sequence of descriptors")]
    InvalidStructure,

    #[error("{location}: descriptor must be a mapping")]
    NotAMapping { location: String },

    #[error("{location}: descriptor is missing 'name'")]
    MissingName { location: String },

    #[error("{location} ('{name}'): descriptor is missing 'type'")]
    MissingType { location: String, name: String },

    #[error("{location} ('{name}'): unknown type '{found}' (expected 'directory' or 'file')")]
    InvalidType {
        location: String,
        name: String,
        found: String,
    },

    #[error("{location} ('{name}'): directory descriptor carries 'content'")]
    ContentOnDirectory { location: String, name: String },

    #[error("{location} ('{name}'): file descriptor carries 'children'")]
    ChildrenOnFile { location: String, name: String },

    #[error("{location} ('{name}'): 'content' must be a scalar")]
    InvalidContent { location: String, name: String },

    #[error("{location} ('{name}'): 'children' must be a sequence")]
    InvalidChildren { location: String, name: String },
}

/// What the local materializer was doing when the filesystem failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalAction {
    CreateDirectory,
    WriteFile,
}

impl std::fmt::Display for LocalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocalAction::CreateDirectory => f.write_str("create directory"),
            LocalAction::WriteFile => f.write_str("write file"),
        }
    }
}

/// Local filesystem failure, tagged with the offending path.
#[derive(Debug, Error)]
#[error("failed to {action} {}: {source}", path.display())]
pub struct MaterializationError {
    pub path: PathBuf,
    pub action: LocalAction,
    #[source]
    pub source: std::io::Error,
}

/// Repository hosting API failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("repository already exists: {0}")]
    AlreadyExists(String),

    #[error("remote API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// Document persistence failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("invalid fingerprint '{0}': expected 64 hex characters")]
    InvalidFingerprint(String),
}

/// Umbrella error returned by pipeline and CLI entry points.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Materialization(#[from] MaterializationError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl ApiError {
    /// Stable category for structured error output.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::Parse(_) => "parse",
            ApiError::Materialization(_) => "materialization",
            ApiError::Remote(_) => "remote",
            ApiError::Storage(_) => "storage",
            ApiError::ConfigError(_) => "config",
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
