//! Tera rendering engine — [`TemplateEngine`] and [`Renderer`].
//!
//! The embedded `accounts.tf.tera` renders Terraform `import` blocks plus an
//! `accounts` local map, one entry per active account in input order. A user
//! template directory may override it or add templates selected by name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::{Tera, Value};

use fleetsync_core::AccountRecord;

use crate::context::TemplateContext;
use crate::error::RenderError;

/// Name of the embedded default template.
pub const DEFAULT_TEMPLATE: &str = "accounts.tf.tera";

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[(DEFAULT_TEMPLATE, include_str!("templates/accounts.tf.tera"))];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path
            .strip_prefix(dir)
            .unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

/// Escape a string for use inside an HCL double-quoted literal.
fn hcl_escape(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = tera::try_get_value!("hcl", "value", String, value);
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            other => out.push(other),
        }
    }
    Ok(Value::String(out))
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(
            normalize_template_name(Path::new(name)),
            (*content).to_string(),
        );
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            tracing::debug!("user template override: {name}");
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.register_filter("hcl", hcl_escape);
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine with embedded templates and optional user overrides.
///
/// `user_template_dir` may contain `.tera` files that override embedded defaults.
/// Template names are normalised to lowercase and relative paths.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    pub fn has_template(&self, name: &str) -> bool {
        let wanted = normalize_template_name(Path::new(name));
        self.tera.get_template_names().any(|n| n == wanted)
    }

    /// Render template `name` with `ctx`. Output line endings are LF.
    pub fn render(&self, name: &str, ctx: &TemplateContext) -> Result<String, RenderError> {
        let wanted = normalize_template_name(Path::new(name));
        if !self.has_template(&wanted) {
            return Err(RenderError::TemplateNotFound { name: name.to_string() });
        }
        let tera_ctx = ctx.to_tera_context()?;
        let content = self.tera.render(&wanted, &tera_ctx)?;
        Ok(content.replace("\r\n", "\n"))
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders the import configuration for a list of accounts.
///
/// Create once and reuse; rendering is deterministic for a given template and
/// account sequence.
pub struct Renderer {
    engine: TemplateEngine,
    template_name: String,
}

impl Renderer {
    /// Embedded templates only, default template.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_templates(None, None)
    }

    /// Embedded templates plus overrides from `user_template_dir`, rendering
    /// `template_name` (or [`DEFAULT_TEMPLATE`]).
    pub fn with_templates(
        user_template_dir: Option<&Path>,
        template_name: Option<&str>,
    ) -> Result<Self, RenderError> {
        Ok(Renderer {
            engine: TemplateEngine::new(user_template_dir)?,
            template_name: template_name.unwrap_or(DEFAULT_TEMPLATE).to_string(),
        })
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    /// Render the configuration text for `accounts`.
    pub fn render(&self, accounts: &[AccountRecord]) -> Result<String, RenderError> {
        let ctx = TemplateContext::from_accounts(accounts)?;
        self.engine.render(&self.template_name, &ctx)
    }

    /// Render and write to `path`, creating parent directories as needed.
    ///
    /// Returns the rendered text.
    pub fn render_to(&self, accounts: &[AccountRecord], path: &Path) -> Result<String, RenderError> {
        let content = self.render(accounts)?;
        write_rendered(path, &content)?;
        tracing::info!(
            path = %path.display(),
            accounts = accounts.len(),
            bytes = content.len(),
            "rendered configuration"
        );
        Ok(content)
    }
}

/// Write via a `.tmp` sibling and rename so readers never see a partial file.
fn write_rendered(path: &Path, content: &str) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts() -> Vec<AccountRecord> {
        vec![
            AccountRecord::new("1", "a@x.com", "A"),
            AccountRecord::new("2", "b@y.com", "B"),
        ]
    }

    #[test]
    fn renderer_new_succeeds() {
        Renderer::new().expect("Renderer::new should succeed with embedded templates");
    }

    #[test]
    fn default_template_contains_import_blocks() {
        let out = Renderer::new().unwrap().render(&accounts()).unwrap();
        assert!(out.contains(r#"to = aws_organizations_account.account["1"]"#));
        assert!(out.contains(r#"id = "2""#));
        assert!(out.contains(r#"email = "b@y.com""#));
    }

    #[test]
    fn empty_account_list_renders() {
        let out = Renderer::new().unwrap().render(&[]).unwrap();
        assert!(out.contains("locals"));
        assert!(!out.contains("import {"));
    }

    #[test]
    fn hcl_filter_escapes_quotes_and_interpolation() {
        let out = Renderer::new()
            .unwrap()
            .render(&[AccountRecord::new("1", "a@x.com", "say \"hi\" ${x}")])
            .unwrap();
        assert!(out.contains(r#"name  = "say \"hi\" $${x}""#), "got:\n{out}");
    }

    #[test]
    fn unknown_template_name_is_not_found() {
        let renderer = Renderer::with_templates(None, Some("missing.tf.tera")).unwrap();
        let err = renderer.render(&accounts()).unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound { .. }), "got: {err}");
    }

    #[test]
    fn no_crlf_in_rendered_output() {
        let out = Renderer::new().unwrap().render(&accounts()).unwrap();
        assert!(!out.contains('\r'));
    }
}
