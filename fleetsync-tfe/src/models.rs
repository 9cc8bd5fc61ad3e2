//! JSON:API request bodies and response shapes for the endpoints fleetsync uses.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::TfeError;

/// `{ "data": ... }` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Document<T> {
    pub data: T,
}

/// A JSON:API resource object.
#[derive(Debug, Clone, Deserialize)]
pub struct Resource<A> {
    pub id: String,
    pub attributes: A,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigurationVersionAttributes {
    #[serde(rename = "upload-url")]
    pub upload_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

pub type ConfigurationVersion = Resource<ConfigurationVersionAttributes>;

#[derive(Debug, Clone, Deserialize)]
pub struct VariableAttributes {
    pub key: String,
    /// `None` for sensitive variables, whose value the API never returns.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub sensitive: bool,
}

pub type WorkspaceVariable = Resource<VariableAttributes>;

/// Body for `POST workspaces/{id}/configuration-versions`.
pub fn create_configuration_version_body(auto_queue_runs: bool) -> Value {
    json!({
        "data": {
            "type": "configuration-versions",
            "attributes": {
                "auto-queue-runs": auto_queue_runs.to_string(),
            }
        }
    })
}

/// Body for `PATCH vars/{id}` replacing the whole value.
pub fn patch_variable_body(variable_id: &str, value: &str) -> Value {
    json!({
        "data": {
            "id": variable_id,
            "type": "vars",
            "attributes": {
                "value": value,
            }
        }
    })
}

/// Decode the `data` member of a response document.
pub fn decode_data<T: DeserializeOwned>(endpoint: &str, response: Value) -> Result<T, TfeError> {
    serde_json::from_value::<Document<T>>(response)
        .map(|doc| doc.data)
        .map_err(|source| TfeError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
}
