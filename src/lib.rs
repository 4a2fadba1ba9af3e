//! Scaffold
//!
//! Turns stored project specifications into concrete project structures:
//! a directory tree on the local filesystem, or a populated repository on a
//! hosting service.
//!
//! Raw input is fingerprinted and translated into a [`document::SpecificationDocument`],
//! stored once under that fingerprint, then loaded into a validated
//! [`tree::SpecTree`] that either materializer consumes.

pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod materialize;
pub mod pipeline;
pub mod remote;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;

pub use error::ApiError;
pub use pipeline::{ingest, Pipeline, PublishOptions};
pub use tree::{Node, SpecTree};
pub use types::Fingerprint;
