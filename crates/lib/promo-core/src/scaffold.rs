//! Marketing project scaffolding.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use crate::error::ToolError;
use crate::workspace::{MARKETING_DIR, marketing_root};

const README_TEMPLATE: &str = "# Marketing

Generated materials for this project, managed by the Promo Studio tools.

## Layout

- `artifacts/` - intermediate materials such as screenshots and screen
  recordings of app functionality
- `assets/` - final materials ready to publish
  - `posts/` - social media posts and content
  - `research/` - research results

## Getting started

1. Launch the companion app and capture a screencast of your app.
2. Create an artifact directory with `create_artifact_directory`.
3. Generate posts and save them with `create_post_asset`.
";

/// Result of scaffolding the marketing project.
#[derive(Debug)]
pub struct ScaffoldOutcome {
    pub project_path: PathBuf,
    pub workspace_file_updated: bool,
}

/// Creates the `marketing/` project skeleton inside the workspace.
///
/// Fails when the directory already exists. A `*.code-workspace` file
/// at the workspace root gets a `marketing` folder entry unless the
/// file already covers it; failures there are logged, not fatal.
///
/// # Errors
/// Returns `ToolError` if `marketing/` exists or a write fails.
pub async fn scaffold_marketing_project(workspace: &Path) -> Result<ScaffoldOutcome, ToolError> {
    let marketing = marketing_root(workspace);
    if marketing.exists() {
        return Err(ToolError::validation(format!(
            "Marketing directory already exists at {}",
            marketing.display()
        )));
    }

    let assets = marketing.join("assets");
    let artifacts = marketing.join("artifacts");
    let posts = assets.join("posts");
    let research = assets.join("research");

    for dir in [&marketing, &assets, &artifacts, &posts, &research] {
        tokio::fs::create_dir_all(dir).await.map_err(|err| {
            ToolError::system(format!("failed to create {}: {err}", dir.display()))
        })?;
    }
    for dir in [&assets, &artifacts, &posts, &research] {
        let keep = dir.join(".gitkeep");
        tokio::fs::write(&keep, "").await.map_err(|err| {
            ToolError::system(format!("failed to write {}: {err}", keep.display()))
        })?;
    }

    let readme = marketing.join("README.md");
    tokio::fs::write(&readme, README_TEMPLATE)
        .await
        .map_err(|err| ToolError::system(format!("failed to write {}: {err}", readme.display())))?;

    let workspace_file_updated = update_workspace_file(workspace).await.unwrap_or_else(|err| {
        tracing::warn!("failed to update workspace file: {err}");
        false
    });

    Ok(ScaffoldOutcome {
        project_path: marketing,
        workspace_file_updated,
    })
}

/// Adds a `marketing` folder entry to the first `*.code-workspace` file.
///
/// Skipped when no workspace file exists, when the file lists the root
/// folder `.`, or when a marketing entry is already present. Returns
/// whether the file was rewritten.
async fn update_workspace_file(workspace: &Path) -> Result<bool, ToolError> {
    let Some(file) = find_workspace_file(workspace).await? else {
        tracing::debug!("no .code-workspace file found, skipping workspace update");
        return Ok(false);
    };

    let content = tokio::fs::read_to_string(&file)
        .await
        .map_err(|err| ToolError::system(format!("failed to read {}: {err}", file.display())))?;
    let mut document: Value = serde_json::from_str(&content)
        .map_err(|err| ToolError::system(format!("failed to parse {}: {err}", file.display())))?;

    let folders = document
        .as_object_mut()
        .ok_or_else(|| ToolError::system("workspace file is not a JSON object"))?
        .entry("folders")
        .or_insert_with(|| Value::Array(Vec::new()));
    let Some(folders) = folders.as_array_mut() else {
        return Err(ToolError::system(
            "workspace file folders entry is not an array",
        ));
    };

    if folder_listed(folders, ".") {
        tracing::debug!("workspace file lists the root folder, skipping workspace update");
        return Ok(false);
    }
    if folder_listed(folders, MARKETING_DIR) || folder_listed(folders, "./marketing") {
        tracing::debug!("marketing folder already listed in workspace file");
        return Ok(false);
    }

    folders.push(json!({ "path": MARKETING_DIR }));
    let rendered = serde_json::to_string_pretty(&document)
        .map_err(|err| ToolError::system(format!("failed to render workspace file: {err}")))?;
    tokio::fs::write(&file, rendered)
        .await
        .map_err(|err| ToolError::system(format!("failed to write {}: {err}", file.display())))?;
    tracing::info!(file = %file.display(), "added marketing folder to workspace file");
    Ok(true)
}

fn folder_listed(folders: &[Value], path: &str) -> bool {
    folders
        .iter()
        .any(|folder| folder.get("path").and_then(Value::as_str) == Some(path))
}

async fn find_workspace_file(workspace: &Path) -> Result<Option<PathBuf>, ToolError> {
    let mut entries = tokio::fs::read_dir(workspace).await.map_err(|err| {
        ToolError::system(format!("failed to read {}: {err}", workspace.display()))
    })?;
    while let Some(entry) = entries.next_entry().await.map_err(|err| {
        ToolError::system(format!("failed to read {}: {err}", workspace.display()))
    })? {
        let path = entry.path();
        if path
            .extension()
            .is_some_and(|extension| extension == "code-workspace")
        {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_the_marketing_skeleton() {
        let workspace = tempfile::tempdir().expect("temp dir");
        let outcome = scaffold_marketing_project(workspace.path())
            .await
            .expect("scaffold succeeds");

        assert_eq!(outcome.project_path, workspace.path().join("marketing"));
        assert!(!outcome.workspace_file_updated);
        for relative in [
            "marketing/assets/posts/.gitkeep",
            "marketing/assets/research/.gitkeep",
            "marketing/assets/.gitkeep",
            "marketing/artifacts/.gitkeep",
            "marketing/README.md",
        ] {
            assert!(
                workspace.path().join(relative).is_file(),
                "{relative} missing"
            );
        }
    }

    #[tokio::test]
    async fn refuses_to_scaffold_twice() {
        let workspace = tempfile::tempdir().expect("temp dir");
        scaffold_marketing_project(workspace.path())
            .await
            .expect("first scaffold succeeds");

        let err = scaffold_marketing_project(workspace.path())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn adds_marketing_to_the_workspace_file() {
        let workspace = tempfile::tempdir().expect("temp dir");
        let file = workspace.path().join("acme.code-workspace");
        std::fs::write(&file, r#"{"folders": [{"path": "web"}]}"#).expect("write workspace file");

        let outcome = scaffold_marketing_project(workspace.path())
            .await
            .expect("scaffold succeeds");
        assert!(outcome.workspace_file_updated);

        let content = std::fs::read_to_string(&file).expect("read workspace file");
        let document: Value = serde_json::from_str(&content).expect("valid JSON");
        let folders = document["folders"].as_array().expect("folders array");
        assert!(folder_listed(folders, "marketing"));
    }

    #[tokio::test]
    async fn leaves_root_folder_workspaces_alone() {
        let workspace = tempfile::tempdir().expect("temp dir");
        let file = workspace.path().join("acme.code-workspace");
        let original = r#"{"folders": [{"path": "."}]}"#;
        std::fs::write(&file, original).expect("write workspace file");

        let outcome = scaffold_marketing_project(workspace.path())
            .await
            .expect("scaffold succeeds");
        assert!(!outcome.workspace_file_updated);
        assert_eq!(
            std::fs::read_to_string(&file).expect("read workspace file"),
            original
        );
    }

    #[tokio::test]
    async fn does_not_duplicate_an_existing_marketing_entry() {
        let workspace = tempfile::tempdir().expect("temp dir");
        let file = workspace.path().join("acme.code-workspace");
        std::fs::write(&file, r#"{"folders": [{"path": "./marketing"}]}"#)
            .expect("write workspace file");

        let outcome = scaffold_marketing_project(workspace.path())
            .await
            .expect("scaffold succeeds");
        assert!(!outcome.workspace_file_updated);
    }
}
