//! TFE bearer token retrieval.
//!
//! Tokens are fetched on demand through [`SecretProvider`]; nothing captures a
//! token at startup, so a rotated secret is picked up on the next call.

use std::fmt;
use std::path::PathBuf;

use crate::error::SecretError;

/// An API bearer token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken(<redacted, {} bytes>)", self.0.len())
    }
}

/// Returns the current TFE bearer token.
pub trait SecretProvider: Send + Sync {
    fn bearer_token(&self) -> Result<BearerToken, SecretError>;
}

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvSecret {
    var: String,
}

impl EnvSecret {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl SecretProvider for EnvSecret {
    fn bearer_token(&self) -> Result<BearerToken, SecretError> {
        let value = std::env::var(&self.var).map_err(|_| SecretError::MissingEnv {
            var: self.var.clone(),
        })?;
        non_empty(value, || format!("environment variable `{}`", self.var))
    }
}

/// Reads the token from a file (e.g. a mounted secret) on every call.
#[derive(Debug, Clone)]
pub struct FileSecret {
    path: PathBuf,
}

impl FileSecret {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SecretProvider for FileSecret {
    fn bearer_token(&self) -> Result<BearerToken, SecretError> {
        let value = std::fs::read_to_string(&self.path).map_err(|source| SecretError::Io {
            path: self.path.clone(),
            source,
        })?;
        non_empty(value, || format!("file {}", self.path.display()))
    }
}

/// Fixed token.
#[derive(Debug, Clone)]
pub struct StaticSecret(pub BearerToken);

impl StaticSecret {
    pub fn new(token: impl Into<String>) -> Self {
        Self(BearerToken::new(token))
    }
}

impl SecretProvider for StaticSecret {
    fn bearer_token(&self) -> Result<BearerToken, SecretError> {
        Ok(self.0.clone())
    }
}

fn non_empty(value: String, origin: impl FnOnce() -> String) -> Result<BearerToken, SecretError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SecretError::Empty { origin: origin() });
    }
    Ok(BearerToken::new(trimmed))
}
