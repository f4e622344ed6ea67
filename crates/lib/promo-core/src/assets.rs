//! Final marketing assets under `marketing/assets/`.

use std::path::{Path, PathBuf};

use crate::error::ToolError;
use crate::workspace::marketing_root;

/// A written asset file.
#[derive(Debug)]
pub struct AssetFile {
    pub path: PathBuf,
    pub name: String,
    pub text_length: usize,
}

/// Writes a post asset into `marketing/assets/posts/`.
///
/// # Errors
/// Returns `ToolError` if the file already exists or a write fails.
pub async fn create_post_asset(
    workspace: &Path,
    name: &str,
    content: &str,
) -> Result<AssetFile, ToolError> {
    write_asset(workspace, "posts", name, content).await
}

/// Writes a research asset into `marketing/assets/research/`.
///
/// # Errors
/// Returns `ToolError` if the file already exists or a write fails.
pub async fn create_research_asset(
    workspace: &Path,
    name: &str,
    content: &str,
) -> Result<AssetFile, ToolError> {
    write_asset(workspace, "research", name, content).await
}

async fn write_asset(
    workspace: &Path,
    kind: &str,
    name: &str,
    content: &str,
) -> Result<AssetFile, ToolError> {
    let directory = marketing_root(workspace).join("assets").join(kind);
    tokio::fs::create_dir_all(&directory).await.map_err(|err| {
        ToolError::system(format!("failed to create {}: {err}", directory.display()))
    })?;

    let file_name = ensure_md(name);
    let path = directory.join(&file_name);
    if path.exists() {
        return Err(ToolError::validation(format!(
            "Asset already exists at {}",
            path.display()
        )));
    }

    tokio::fs::write(&path, content)
        .await
        .map_err(|err| ToolError::system(format!("failed to write {}: {err}", path.display())))?;
    tracing::info!(file = %path.display(), "created {kind} asset");

    Ok(AssetFile {
        path,
        name: file_name,
        text_length: content.len(),
    })
}

fn ensure_md(name: &str) -> String {
    if name.ends_with(".md") {
        name.to_string()
    } else {
        format!("{name}.md")
    }
}
