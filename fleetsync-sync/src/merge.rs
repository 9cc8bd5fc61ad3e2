//! Variable merge: fetch workspace variables → locate the registry variable →
//! merge one account → PATCH the full value back.
//!
//! ## Concurrency
//!
//! This is a plain read-modify-write with no version check. Two merges for
//! different accounts running at the same time can both read the same
//! registry, and the later PATCH overwrites the earlier one. Callers that
//! need every merge to land must serialize invocations per workspace.

use serde::Serialize;

use fleetsync_core::{AccountRecord, AccountRegistry, MergeSettings};
use fleetsync_tfe::models::{self, WorkspaceVariable};
use fleetsync_tfe::{Method, TfeApi};

use crate::error::SyncError;

/// Result of a merge run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// The registry variable was found and patched with the merged map.
    Patched {
        variable_id: String,
        registry: AccountRegistry,
    },
    /// No variable with the configured key; nothing was sent.
    VariableNotFound { key: String, scanned: usize },
}

/// Log a merge failure with context, then convert it.
fn step<T, E>(name: &'static str, result: Result<T, E>) -> Result<T, SyncError>
where
    E: Into<SyncError>,
{
    result.map_err(|e| {
        let e = e.into();
        tracing::error!(step = name, "merge aborted: {e}");
        e
    })
}

/// `GET vars` filtered by workspace and organization name.
pub fn fetch_variables(
    api: &dyn TfeApi,
    settings: &MergeSettings,
) -> Result<Vec<WorkspaceVariable>, SyncError> {
    let query = [
        ("filter[workspace][name]", settings.workspace.as_str()),
        ("filter[organization][name]", settings.organization.as_str()),
    ];
    let response = step(
        "list-variables",
        api.call(Method::Get, "vars", &query, None),
    )?;
    let variables: Vec<WorkspaceVariable> =
        step("list-variables", models::decode_data("vars", response))?;
    tracing::info!(
        workspace = %settings.workspace,
        variables = variables.len(),
        "fetched workspace variables"
    );
    Ok(variables)
}

/// First variable whose key equals `key`.
pub fn find_variable<'v>(variables: &'v [WorkspaceVariable], key: &str) -> Option<&'v WorkspaceVariable> {
    variables.iter().find(|var| {
        let matched = var.attributes.key == key;
        if !matched {
            tracing::debug!("{} does not match {key}", var.attributes.key);
        }
        matched
    })
}

/// Decode the registry held by `variable`.
pub fn registry_of(variable: &WorkspaceVariable) -> Result<AccountRegistry, SyncError> {
    let Some(raw) = variable.attributes.value.as_deref() else {
        tracing::warn!(
            variable = %variable.id,
            sensitive = variable.attributes.sensitive,
            "registry variable has no readable value"
        );
        return step(
            "read-registry",
            Err(SyncError::VariableValueUnavailable {
                key: variable.attributes.key.clone(),
                variable_id: variable.id.clone(),
            }),
        );
    };
    tracing::debug!(variable = %variable.id, existing = raw, "existing registry value");
    step("read-registry", AccountRegistry::parse(raw))
}

/// Read the current registry without modifying it.
///
/// `Ok(None)` when no variable matches the configured key.
pub fn read_registry(
    api: &dyn TfeApi,
    settings: &MergeSettings,
) -> Result<Option<(String, AccountRegistry)>, SyncError> {
    let variables = fetch_variables(api, settings)?;
    match find_variable(&variables, &settings.variable_key) {
        Some(variable) => Ok(Some((variable.id.clone(), registry_of(variable)?))),
        None => Ok(None),
    }
}

/// Merge `record` into the registry variable and PATCH it.
pub fn merge_account(
    api: &dyn TfeApi,
    settings: &MergeSettings,
    record: &AccountRecord,
) -> Result<MergeOutcome, SyncError> {
    if let Some(field) = record.first_blank_field() {
        return step("validate-account", Err(SyncError::InvalidAccount { field }));
    }

    let variables = fetch_variables(api, settings)?;
    let Some(variable) = find_variable(&variables, &settings.variable_key) else {
        tracing::info!(
            key = %settings.variable_key,
            scanned = variables.len(),
            "registry variable not found; nothing to patch"
        );
        return Ok(MergeOutcome::VariableNotFound {
            key: settings.variable_key.clone(),
            scanned: variables.len(),
        });
    };
    tracing::info!(variable = %variable.id, key = %settings.variable_key, "found registry variable");

    let mut registry = registry_of(variable)?;
    registry.merge(record);
    let value = step("encode-registry", registry.to_json_string())?;

    let endpoint = format!("vars/{}", variable.id);
    let body = models::patch_variable_body(&variable.id, &value);
    tracing::debug!(patch = %body, "registry patch");
    step("patch-variable", api.call(Method::Patch, &endpoint, &[], Some(&body)))?;
    tracing::info!(
        variable = %variable.id,
        acct_id = %record.id,
        entries = registry.len(),
        "merged account into registry"
    );

    Ok(MergeOutcome::Patched {
        variable_id: variable.id.clone(),
        registry,
    })
}
