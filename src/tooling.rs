//! Tooling & Integration Layer
//!
//! Command-line entry points over the pipeline and the renderings they print.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands, OutputFormat};
