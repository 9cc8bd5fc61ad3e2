//! # fleetsync-sync
//!
//! The two orchestrators and the archiver they share.
//!
//! - [`pipeline::run`] renders the active fleet, packages it with
//!   [`archive::archive`], and uploads it as a new configuration version.
//! - [`merge::merge_account`] folds one account into the JSON registry held in
//!   a workspace variable.

pub mod archive;
pub mod error;
pub mod merge;
pub mod pipeline;

pub use error::{ArchiveError, SyncError};
pub use merge::{merge_account, read_registry, MergeOutcome};
pub use pipeline::{run, ConfigSyncOutcome, ImportMode};
