//! fleetsync core library — domain types, account registry, inventory and
//! secret seams, settings, errors.
//!
//! - [`types`] — newtypes and [`AccountRecord`]
//! - [`registry`] — [`AccountRegistry`] decode / merge / encode
//! - [`source`] — [`AccountSource`] and the YAML [`InventoryFile`]
//! - [`secret`] — [`SecretProvider`] implementations
//! - [`settings`] — orchestrator settings
//! - [`error`] — error enums

pub mod error;
pub mod registry;
pub mod secret;
pub mod settings;
pub mod source;
pub mod types;

pub use error::{RegistryError, SecretError, SourceError};
pub use registry::{AccountRegistry, RegistryEntry};
pub use secret::{BearerToken, EnvSecret, FileSecret, SecretProvider, StaticSecret};
pub use settings::{ImportSettings, MergeSettings, TfeSettings};
pub use source::{AccountSource, InventoryFile, StaticAccounts};
pub use types::{AccountId, AccountRecord, OrganizationName, WorkspaceName};
