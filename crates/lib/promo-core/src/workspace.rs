//! Workspace path resolution and well-known project directories.

use std::path::{Path, PathBuf};

use crate::error::ToolError;

/// Environment variable the editor sets to the open workspace folders.
pub const WORKSPACE_ENV_VAR: &str = "WORKSPACE_FOLDER_PATHS";

/// Directory the companion app records captures into.
pub const CAPTURE_DIR: &str = "promo.studio";

/// Directory holding generated marketing content.
pub const MARKETING_DIR: &str = "marketing";

/// Resolves the workspace root from the process environment.
///
/// # Errors
/// Returns `ToolError` if `WORKSPACE_FOLDER_PATHS` is unset or unusable.
pub fn workspace_root() -> Result<PathBuf, ToolError> {
    let raw = std::env::var(WORKSPACE_ENV_VAR).ok();
    resolve_workspace(raw.as_deref())
}

/// Resolves the workspace root from a raw `WORKSPACE_FOLDER_PATHS` value.
///
/// Multi-root workspaces arrive as a comma-separated list. The first
/// entry points at a folder inside the project, so its parent is the
/// project root. A single entry is the root itself.
///
/// # Errors
/// Returns `ToolError` if the value is empty or no parent can be derived.
pub fn resolve_workspace(raw: Option<&str>) -> Result<PathBuf, ToolError> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty());
    let Some(raw) = raw else {
        return Err(ToolError::configuration(
            "WORKSPACE_FOLDER_PATHS is not set. Open the project folder in your editor so the \
             workspace path is available to the server.",
        ));
    };

    if let Some((first, _)) = raw.split_once(',') {
        let first = first.trim();
        Path::new(first).parent().map_or_else(
            || {
                Err(ToolError::configuration(format!(
                    "cannot determine the project root from workspace entry '{first}'"
                )))
            },
            |parent| Ok(parent.to_path_buf()),
        )
    } else {
        Ok(PathBuf::from(raw))
    }
}

#[must_use]
pub fn capture_root(workspace: &Path) -> PathBuf {
    workspace.join(CAPTURE_DIR)
}

#[must_use]
pub fn screencasts_dir(workspace: &Path) -> PathBuf {
    capture_root(workspace).join("screencasts")
}

#[must_use]
pub fn gifs_dir(workspace: &Path) -> PathBuf {
    capture_root(workspace).join("gifs")
}

#[must_use]
pub fn marketing_root(workspace: &Path) -> PathBuf {
    workspace.join(MARKETING_DIR)
}

/// Artifact staging area managed by the companion app.
#[must_use]
pub fn artifacts_root(workspace: &Path) -> PathBuf {
    capture_root(workspace).join("artifacts")
}
