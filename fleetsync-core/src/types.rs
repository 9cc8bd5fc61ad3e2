//! Domain types shared by every fleetsync crate.
//!
//! Names travelling to TFE are newtypes so a workspace id can never be passed
//! where an organization name is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_newtype!(
    /// Identifier of a fleet account. Identity of an [`AccountRecord`].
    AccountId
);

string_newtype!(
    /// A TFE workspace reference as it appears in API paths (`ws-…` id or name).
    WorkspaceName
);

string_newtype!(
    /// A TFE organization name.
    OrganizationName
);

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One active account read from the fleet inventory.
///
/// Serialized field names match the attribute names used in templates and in
/// the workspace registry variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(rename = "acct_id")]
    pub id: AccountId,
    #[serde(rename = "acct_email")]
    pub email: String,
    #[serde(rename = "acct_name")]
    pub name: String,
}

impl AccountRecord {
    pub fn new(id: impl Into<AccountId>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
        }
    }

    /// Name of the first required field that is blank, if any.
    pub fn first_blank_field(&self) -> Option<&'static str> {
        if self.id.0.trim().is_empty() {
            Some("acct_id")
        } else if self.email.trim().is_empty() {
            Some("acct_email")
        } else if self.name.trim().is_empty() {
            Some("acct_name")
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
