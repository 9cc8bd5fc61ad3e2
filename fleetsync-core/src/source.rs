//! Fleet inventory access.
//!
//! The datastore itself is an external collaborator; [`AccountSource`] is the
//! seam the sync pipeline reads through. [`InventoryFile`] is the concrete
//! source shipped with the CLI: a YAML export of datastore items.
//!
//! # Inventory format
//!
//! ```yaml
//! - acct_id: "111111111111"
//!   acct_email: ops@example.com
//!   acct_name: ops
//!   acct_status: active
//! - acct_id: "222222222222"
//!   acct_email: legacy@example.com
//!   acct_name: legacy
//!   acct_status: suspended
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_yaml::Value;

use crate::error::SourceError;
use crate::types::{AccountId, AccountRecord};

/// Attribute value selecting active accounts.
pub const ACTIVE_STATUS: &str = "active";

/// Default name of the status attribute queried by [`InventoryFile`].
pub const DEFAULT_STATUS_ATTRIBUTE: &str = "acct_status";

/// A source of active account records.
///
/// Implementations return records in source order; callers must not rely on
/// any particular sort.
pub trait AccountSource {
    fn active_accounts(&self) -> Result<Vec<AccountRecord>, SourceError>;
}

/// Raw datastore item. Only the account and status attributes are read;
/// anything else an item carries is ignored.
pub type InventoryItem = BTreeMap<String, Value>;

/// YAML inventory file queried by a status attribute.
#[derive(Debug, Clone)]
pub struct InventoryFile {
    path: PathBuf,
    status_attribute: String,
}

impl InventoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            status_attribute: DEFAULT_STATUS_ATTRIBUTE.to_string(),
        }
    }

    /// Use a different status attribute name for the active-account query.
    pub fn with_status_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.status_attribute = attribute.into();
        self
    }

    fn load_items(&self) -> Result<Vec<InventoryItem>, SourceError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(vec![]);
        }
        serde_yaml::from_str(&contents).map_err(|source| SourceError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

impl AccountSource for InventoryFile {
    fn active_accounts(&self) -> Result<Vec<AccountRecord>, SourceError> {
        let items = self.load_items()?;
        let total = items.len();
        let records = items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.get(&self.status_attribute).and_then(scalar).as_deref() == Some(ACTIVE_STATUS)
            })
            .map(|(index, item)| record_from_item(index, item))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(
            path = %self.path.display(),
            total,
            active = records.len(),
            "loaded fleet inventory"
        );
        Ok(records)
    }
}

/// Map a datastore item onto an [`AccountRecord`].
pub fn record_from_item(index: usize, item: &InventoryItem) -> Result<AccountRecord, SourceError> {
    let field = |attribute: &'static str| {
        let value = item
            .get(attribute)
            .ok_or(SourceError::MissingAttribute { index, attribute })?;
        scalar(value).ok_or(SourceError::InvalidAttribute { index, attribute })
    };
    Ok(AccountRecord {
        id: AccountId::from(field("acct_id")?),
        email: field("acct_email")?,
        name: field("acct_name")?,
    })
}

/// String form of a scalar attribute. Unquoted numeric ids are common in
/// exports, so numbers and booleans are rendered as text.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// In-memory source, mostly useful for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticAccounts(pub Vec<AccountRecord>);

impl AccountSource for StaticAccounts {
    fn active_accounts(&self) -> Result<Vec<AccountRecord>, SourceError> {
        Ok(self.0.clone())
    }
}
