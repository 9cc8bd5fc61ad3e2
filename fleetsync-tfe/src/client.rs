//! Blocking TFE v2 API client.
//!
//! Every call fetches the bearer token from the [`SecretProvider`], so a
//! rotated secret takes effect on the next request. Nothing is retried: a
//! non-2xx status or network failure is returned to the caller as-is.

use std::fmt;

use serde_json::Value;

use fleetsync_core::{SecretProvider, TfeSettings};

use crate::error::TfeError;

/// Media type required by the TFE JSON:API endpoints.
pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// HTTP verbs used against TFE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two operations the orchestrators need from TFE.
///
/// [`TfeClient`] is the real implementation; tests drive the orchestrators
/// with recording fakes.
pub trait TfeApi {
    /// Authenticated JSON:API call. `endpoint` is relative to the API base.
    fn call(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, TfeError>;

    /// Unauthenticated PUT of archive bytes to a pre-signed upload URL.
    ///
    /// Returns the response status whatever it is; only network failures are
    /// errors. Callers decide which statuses count as success.
    fn upload(&self, url: &str, archive: &[u8]) -> Result<u16, TfeError>;
}

/// `ureq`-backed [`TfeApi`].
pub struct TfeClient {
    agent: ureq::Agent,
    base_url: String,
    secret: Box<dyn SecretProvider>,
}

impl TfeClient {
    pub fn new(settings: &TfeSettings, secret: impl SecretProvider + 'static) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            secret: Box::new(secret),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

impl TfeApi for TfeClient {
    fn call(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, TfeError> {
        let token = self.secret.bearer_token().map_err(|e| {
            tracing::error!(%method, endpoint, "cannot retrieve TFE token: {e}");
            TfeError::from(e)
        })?;
        let url = self.url(endpoint);
        tracing::info!(%method, %url, ?query, "calling TFE API");
        if let Some(body) = body {
            tracing::debug!(%method, endpoint, payload = %body, "request payload");
        }

        let mut request = self
            .agent
            .request(method.as_str(), &url)
            .set("Authorization", &token.header_value())
            .set("Content-Type", JSON_API_CONTENT_TYPE);
        for (key, value) in query {
            request = request.query(key, value);
        }

        let result = match body {
            Some(body) => {
                let bytes = serde_json::to_vec(body).map_err(|e| {
                    tracing::error!(%method, endpoint, "cannot encode request body: {e}");
                    TfeError::from(e)
                })?;
                request.send_bytes(&bytes)
            }
            None => request.call(),
        };

        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                tracing::error!(%method, endpoint, status, %body, "TFE API error");
                return Err(TfeError::Api {
                    method,
                    endpoint: endpoint.to_string(),
                    status,
                    body,
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                tracing::error!(%method, endpoint, "TFE transport error: {transport}");
                return Err(TfeError::Transport {
                    method,
                    endpoint: endpoint.to_string(),
                    message: transport.to_string(),
                });
            }
        };

        let status = response.status();
        let text = response.into_string().map_err(|e| TfeError::Transport {
            method,
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(%method, endpoint, status, bytes = text.len(), "TFE API response");
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|source| TfeError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    fn upload(&self, url: &str, archive: &[u8]) -> Result<u16, TfeError> {
        let shown = redact_url(url);
        tracing::info!(url = %shown, bytes = archive.len(), "uploading configuration archive");

        let result = self
            .agent
            .put(url)
            .set("Content-Type", "application/octet-stream")
            .send_bytes(archive);

        match result {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(status, _)) => Ok(status),
            Err(ureq::Error::Transport(transport)) => {
                tracing::error!(url = %shown, "upload transport error: {transport}");
                Err(TfeError::Transport {
                    method: Method::Put,
                    endpoint: shown,
                    message: transport.to_string(),
                })
            }
        }
    }
}

/// Keep scheme and host of a pre-signed URL; path and query carry the
/// credential.
pub fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return "<redacted>".to_string();
    };
    let host_start = scheme_end + 3;
    match url[host_start..].find(|c: char| c == '/' || c == '?') {
        Some(cut) => format!("{}/<redacted>", &url[..host_start + cut]),
        None => url.to_string(),
    }
}
