//! # fleetsync-tfe
//!
//! Thin blocking client for the Terraform Enterprise v2 API: authenticated
//! JSON:API calls, pre-signed archive uploads, and the request/response
//! shapes used by the sync orchestrators.

pub mod client;
pub mod error;
pub mod models;

pub use client::{redact_url, Method, TfeApi, TfeClient, JSON_API_CONTENT_TYPE};
pub use error::TfeError;
pub use models::{ConfigurationVersion, WorkspaceVariable};
