//! Materializers
//!
//! Walk a validated specification tree and produce its directories and files,
//! either on the local filesystem or in a remote repository. Both backends
//! share the traversal in [`plan`] but keep distinct failure contracts: the
//! local backend stops at the first error, the remote backend records each
//! failure and continues.

pub mod local;
pub mod plan;
pub mod remote;

pub use local::{LocalMaterializer, LocalReport};
pub use plan::{Step, Walk};
pub use remote::{
    checked_base_path, remote_entries, CommitMessages, EntryKind, PathOutcome, RemoteEntry, RemoteMaterializer,
    RemoteReport, PLACEHOLDER_FILE,
};
