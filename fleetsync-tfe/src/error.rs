//! Error types for fleetsync-tfe.

use thiserror::Error;

use fleetsync_core::SecretError;

use crate::client::Method;

/// All errors that can arise from a TFE API call.
#[derive(Debug, Error)]
pub enum TfeError {
    /// The API answered with status >= 400. `body` is the raw response text.
    #[error("TFE API {method} {endpoint} failed with status {status}: {body}")]
    Api {
        method: Method,
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Connection, TLS, DNS or other network-level failure.
    #[error("TFE API {method} {endpoint} transport error: {message}")]
    Transport {
        method: Method,
        endpoint: String,
        message: String,
    },

    /// The bearer token could not be retrieved; no request was sent.
    #[error("TFE auth token unavailable: {0}")]
    Secret(#[from] SecretError),

    /// A success response whose body is not JSON.
    #[error("TFE API {endpoint} returned an undecodable body: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// Encoding a request body failed.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl TfeError {
    /// True for failures reported by, or on the way to, the API itself
    /// (HTTP status >= 400 or a network failure).
    pub fn is_api_error(&self) -> bool {
        matches!(self, TfeError::Api { .. } | TfeError::Transport { .. })
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            TfeError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
