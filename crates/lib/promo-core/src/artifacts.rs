//! Timestamped artifact directories under the capture area.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::ToolError;
use crate::workspace::artifacts_root;

pub const ARTIFACT_SUBDIRS: [&str; 4] = ["screenshots", "videos", "posts", "gifs"];

/// Directory name suffix for new artifacts, second precision, UTC.
#[must_use]
pub fn artifact_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// A created artifact directory.
#[derive(Debug)]
pub struct ArtifactDirectory {
    pub path: PathBuf,
    pub name: String,
}

/// Creates `<artifact_name>-<timestamp>/` with its capture subfolders.
///
/// The artifacts root must already exist; the companion app creates it
/// when it starts capturing.
///
/// # Errors
/// Returns `ToolError` if the root is missing, the directory already
/// exists, or a write fails.
pub async fn create_artifact_directory(
    workspace: &Path,
    artifact_name: &str,
    now: DateTime<Utc>,
) -> Result<ArtifactDirectory, ToolError> {
    let root = artifacts_root(workspace);
    if !root.is_dir() {
        return Err(ToolError::validation(format!(
            "Artifacts directory does not exist at {}. Launch the companion app to create it.",
            root.display()
        )));
    }

    let name = format!("{artifact_name}-{}", artifact_timestamp(now));
    let path = root.join(&name);
    if path.exists() {
        return Err(ToolError::validation(format!(
            "Artifact directory already exists at {}",
            path.display()
        )));
    }

    tracing::info!(name, "creating artifact directory");
    tokio::fs::create_dir_all(&path)
        .await
        .map_err(|err| ToolError::system(format!("failed to create {}: {err}", path.display())))?;
    for subdir in ARTIFACT_SUBDIRS {
        let dir = path.join(subdir);
        tokio::fs::create_dir_all(&dir).await.map_err(|err| {
            ToolError::system(format!("failed to create {}: {err}", dir.display()))
        })?;
        let keep = dir.join(".gitkeep");
        tokio::fs::write(&keep, "").await.map_err(|err| {
            ToolError::system(format!("failed to write {}: {err}", keep.display()))
        })?;
    }

    Ok(ArtifactDirectory { path, name })
}

/// Writes a post file into an existing artifact directory.
///
/// `artifact_name` is the full directory name including its timestamp.
/// Existing files are never overwritten.
///
/// # Errors
/// Returns `ToolError` if the artifact directory is missing, the file
/// already exists, or a write fails.
pub async fn create_post_artifact(
    workspace: &Path,
    artifact_name: &str,
    file_name: &str,
    content: &str,
) -> Result<PathBuf, ToolError> {
    let root = artifacts_root(workspace);
    if !root.is_dir() {
        return Err(ToolError::validation(format!(
            "Artifacts directory does not exist at {}. Launch the companion app to create it.",
            root.display()
        )));
    }

    let artifact = root.join(artifact_name);
    if !artifact.is_dir() {
        return Err(ToolError::validation(format!(
            "Artifact directory does not exist at {}",
            artifact.display()
        )));
    }

    let posts = artifact.join("posts");
    tokio::fs::create_dir_all(&posts)
        .await
        .map_err(|err| ToolError::system(format!("failed to create {}: {err}", posts.display())))?;

    let file = posts.join(file_name);
    if file.exists() {
        return Err(ToolError::validation(format!(
            "Post file already exists at {}",
            file.display()
        )));
    }

    tokio::fs::write(&file, content)
        .await
        .map_err(|err| ToolError::system(format!("failed to write {}: {err}", file.display())))?;
    tracing::info!(file = %file.display(), "created post artifact");
    Ok(file)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 9, 14, 30, 5)
            .single()
            .expect("valid timestamp")
    }

    fn prepare_artifacts_root(workspace: &Path) {
        std::fs::create_dir_all(artifacts_root(workspace)).expect("create artifacts root");
    }

    #[test]
    fn timestamp_uses_filesystem_safe_separators() {
        assert_eq!(artifact_timestamp(fixed_now()), "2026-03-09_14-30-05");
    }

    #[tokio::test]
    async fn requires_the_companion_managed_root() {
        let workspace = tempfile::tempdir().expect("temp dir");
        let err = create_artifact_directory(workspace.path(), "chat", fixed_now())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn creates_the_subfolder_layout() {
        let workspace = tempfile::tempdir().expect("temp dir");
        prepare_artifacts_root(workspace.path());

        let artifact = create_artifact_directory(workspace.path(), "chat", fixed_now())
            .await
            .expect("artifact directory created");

        assert_eq!(artifact.name, "chat-2026-03-09_14-30-05");
        for subdir in ARTIFACT_SUBDIRS {
            assert!(artifact.path.join(subdir).join(".gitkeep").is_file());
        }
    }

    #[tokio::test]
    async fn refuses_to_recreate_an_artifact() {
        let workspace = tempfile::tempdir().expect("temp dir");
        prepare_artifacts_root(workspace.path());

        create_artifact_directory(workspace.path(), "chat", fixed_now())
            .await
            .expect("first creation succeeds");
        let err = create_artifact_directory(workspace.path(), "chat", fixed_now())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn writes_posts_into_an_existing_artifact() {
        let workspace = tempfile::tempdir().expect("temp dir");
        prepare_artifacts_root(workspace.path());
        let artifact = create_artifact_directory(workspace.path(), "chat", fixed_now())
            .await
            .expect("artifact directory created");

        let file = create_post_artifact(workspace.path(), &artifact.name, "launch.md", "# Launch")
            .await
            .expect("post created");
        assert_eq!(
            std::fs::read_to_string(&file).expect("read post"),
            "# Launch"
        );

        let err = create_post_artifact(workspace.path(), &artifact.name, "launch.md", "again")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn rejects_posts_for_unknown_artifacts() {
        let workspace = tempfile::tempdir().expect("temp dir");
        prepare_artifacts_root(workspace.path());

        let err = create_post_artifact(workspace.path(), "missing", "launch.md", "body")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
