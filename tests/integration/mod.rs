//! Integration tests for the scaffold pipeline

mod cli_contracts;
mod pipeline_flow;
mod remote_materialize;
mod tree_properties;
