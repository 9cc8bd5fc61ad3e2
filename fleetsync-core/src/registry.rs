//! Account registry stored as the JSON value of a TFE workspace variable.
//!
//! # Shape
//!
//! ```text
//! {
//!   "<acct_id>": { "acct_email": "...", "acct_name": "..." },
//!   ...
//! }
//! ```
//!
//! The registry only grows: [`AccountRegistry::merge`] inserts or replaces a
//! single id and never drops other keys. Entries written by other tools are
//! kept verbatim, so they are held as raw JSON values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RegistryError;
use crate::types::{AccountId, AccountRecord};

/// Registry value for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub acct_email: String,
    pub acct_name: String,
}

impl From<&AccountRecord> for RegistryEntry {
    fn from(record: &AccountRecord) -> Self {
        Self {
            acct_email: record.email.clone(),
            acct_name: record.name.clone(),
        }
    }
}

/// Map of account id to registry entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountRegistry(BTreeMap<String, Value>);

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the string value of the registry variable.
    ///
    /// Returns [`RegistryError::Parse`] for malformed JSON and
    /// [`RegistryError::NotAnObject`] for any JSON value that is not an object.
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|source| RegistryError::Parse { source })?;
        match value {
            Value::Object(map) => Ok(Self(map.into_iter().collect())),
            other => Err(RegistryError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }

    /// Encode back to the compact JSON string sent in the variable `value`.
    pub fn to_json_string(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Right-biased merge of a single account: the incoming entry replaces any
    /// existing entry with the same id, every other id is untouched.
    pub fn merge(&mut self, record: &AccountRecord) {
        let entry = RegistryEntry::from(record);
        let value = serde_json::json!({
            "acct_email": entry.acct_email,
            "acct_name": entry.acct_name,
        });
        if let Some(previous) = self.0.insert(record.id.0.clone(), value) {
            tracing::debug!(acct_id = %record.id, ?previous, "replaced registry entry");
        }
    }

    /// Typed view of one entry. `None` if absent or not in the standard shape.
    pub fn get(&self, id: &AccountId) -> Option<RegistryEntry> {
        self.0
            .get(id.as_str())
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.0.contains_key(id.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Account ids in key order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.0.clone().into_iter().collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
