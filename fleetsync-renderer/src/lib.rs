//! # fleetsync-renderer
//!
//! Tera-based engine that renders the account import configuration uploaded
//! to the TFE workspace.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use fleetsync_core::AccountRecord;
//! use fleetsync_renderer::Renderer;
//!
//! fn render(accounts: &[AccountRecord]) -> Result<(), fleetsync_renderer::RenderError> {
//!     let renderer = Renderer::new()?;
//!     renderer.render_to(accounts, Path::new("out/tf_import/import_accounts.tf"))?;
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::TemplateContext;
pub use engine::{Renderer, TemplateEngine, DEFAULT_TEMPLATE};
pub use error::RenderError;
