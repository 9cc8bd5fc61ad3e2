//! Template context — serializable rendering payload built from account records.

use serde::{Deserialize, Serialize};

use fleetsync_core::AccountRecord;

use crate::error::RenderError;

/// Rendering payload.
///
/// `accounts` keeps the caller's order; templates iterate it as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateContext {
    pub accounts: Vec<AccountRecord>,
    pub account_count: usize,
    pub meta: MetaCtx,
}

/// Generator metadata. Contains nothing run-specific so output stays
/// byte-identical for identical input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaCtx {
    pub fleetsync_version: String,
}

impl TemplateContext {
    /// Build a [`TemplateContext`], rejecting records with blank fields.
    pub fn from_accounts(accounts: &[AccountRecord]) -> Result<Self, RenderError> {
        for (index, record) in accounts.iter().enumerate() {
            if let Some(field) = record.first_blank_field() {
                return Err(RenderError::MissingField { index, field });
            }
        }
        Ok(TemplateContext {
            accounts: accounts.to_vec(),
            account_count: accounts.len(),
            meta: MetaCtx {
                fleetsync_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        })
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
