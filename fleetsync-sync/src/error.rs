//! Error types for fleetsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use fleetsync_core::{RegistryError, SourceError};
use fleetsync_renderer::RenderError;
use fleetsync_tfe::TfeError;

/// Errors from packaging rendered files.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A listed file does not exist directly under the source directory.
    #[error("archive source file missing: {path}")]
    MissingSource { path: PathBuf },

    /// A listed name is not a bare file name.
    #[error("archive member `{name}` must be a bare file name")]
    InvalidName { name: String },

    #[error("nothing to archive")]
    NoFiles,

    #[error("archive I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// All errors that can arise from either orchestrator.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("account source error: {0}")]
    Source(#[from] SourceError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// A TFE call failed (status >= 400, network, token, decode).
    #[error("TFE error: {0}")]
    Tfe(#[from] TfeError),

    /// The configuration version was created but carries no upload URL.
    #[error("configuration version {configuration_version} has no upload-url")]
    MissingUploadUrl { configuration_version: String },

    /// The pre-signed upload did not answer 200. The configuration version
    /// exists server-side but holds no content.
    #[error("workspace configuration upload failed with status {status}")]
    Upload { status: u16 },

    /// The registry variable value could not be decoded.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The registry variable is sensitive, so its value cannot be read back.
    #[error("variable `{key}` ({variable_id}) has no readable value")]
    VariableValueUnavailable { key: String, variable_id: String },

    /// The account to merge has a blank field.
    #[error("account to merge is missing `{field}`")]
    InvalidAccount { field: &'static str },
}

/// Convenience constructor for [`ArchiveError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ArchiveError {
    ArchiveError::Io {
        path: path.into(),
        source,
    }
}
