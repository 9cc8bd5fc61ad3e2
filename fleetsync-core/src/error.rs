//! Error types for fleetsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from decoding the account registry stored in a workspace variable.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The variable value is not valid JSON.
    #[error("failed to parse account registry: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    /// The variable value is valid JSON but not an object keyed by account id.
    #[error("account registry must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// Re-encoding the merged registry failed.
    #[error("failed to encode account registry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors from reading the fleet inventory.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("inventory I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, with file path and serde_yaml line context.
    #[error("failed to parse inventory at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An active item lacks one of `acct_id`, `acct_email`, `acct_name`.
    #[error("inventory item {index} is missing attribute `{attribute}`")]
    MissingAttribute { index: usize, attribute: &'static str },

    /// An account attribute is a list or map instead of a scalar.
    #[error("inventory item {index} attribute `{attribute}` is not a scalar value")]
    InvalidAttribute { index: usize, attribute: &'static str },
}

/// Errors from retrieving the TFE bearer token.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret environment variable `{var}` is not set")]
    MissingEnv { var: String },

    #[error("failed to read secret file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("secret from {origin} is empty")]
    Empty { origin: String },
}
