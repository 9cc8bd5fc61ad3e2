//! Error types for fleetsync-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from rendering the import configuration.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// The requested template is neither embedded nor in the user template dir.
    #[error("template `{name}` not found")]
    TemplateNotFound { name: String },

    /// An account record has a blank required field.
    #[error("account at position {index} is missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    /// Filesystem error while loading user templates or writing output.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}
