//! Run settings for the two orchestrators.
//!
//! Plain structs; the CLI fills them from flags and environment variables.

use std::path::{Path, PathBuf};

use crate::types::{OrganizationName, WorkspaceName};

/// Public TFE API root.
pub const DEFAULT_TFE_BASE_URL: &str = "https://app.terraform.io/api/v2";

/// Subdirectory of the base output path that holds rendered files.
pub const RENDER_SUBDIR: &str = "tf_import";
pub const DEFAULT_RENDERED_FILE: &str = "import_accounts.tf";
pub const DEFAULT_ARCHIVE_FILE: &str = "import_accounts.tar.gz";

/// Connection settings shared by every TFE call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TfeSettings {
    pub base_url: String,
}

impl Default for TfeSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TFE_BASE_URL.to_string(),
        }
    }
}

/// Settings for the configuration sync (import) path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    /// Workspace id used in `workspaces/{id}/configuration-versions`.
    pub workspace: WorkspaceName,
    /// Directory the configuration is rendered and archived into.
    pub render_dir: PathBuf,
    pub rendered_file: String,
    pub archive_file: String,
    /// Optional directory of `.tera` files overriding the embedded template.
    pub template_dir: Option<PathBuf>,
    /// Template to render; `None` selects the embedded default.
    pub template_name: Option<String>,
}

impl ImportSettings {
    /// Defaults rooted at `<base_output>/tf_import`.
    pub fn new(workspace: impl Into<WorkspaceName>, base_output: &Path) -> Self {
        Self {
            workspace: workspace.into(),
            render_dir: base_output.join(RENDER_SUBDIR),
            rendered_file: DEFAULT_RENDERED_FILE.to_string(),
            archive_file: DEFAULT_ARCHIVE_FILE.to_string(),
            template_dir: None,
            template_name: None,
        }
    }

    pub fn rendered_path(&self) -> PathBuf {
        self.render_dir.join(&self.rendered_file)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.render_dir.join(&self.archive_file)
    }
}

/// Settings for the variable merge (update) path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSettings {
    pub organization: OrganizationName,
    pub workspace: WorkspaceName,
    /// Key of the workspace variable holding the account registry.
    pub variable_key: String,
}
