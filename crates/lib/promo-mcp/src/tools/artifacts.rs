//! Artifact directory and post artifact tools.

use chrono::Utc;
use promo_core::gate::ToolGroup;
use promo_core::workspace::workspace_root;
use rmcp::model::JsonObject;
use rmcp::schemars;
use serde::Deserialize;
use serde_json::json;

use crate::catalog::ToolDescriptor;
use crate::helpers;

const GROUPS: &[ToolGroup] = &[ToolGroup::Artifacts];

pub fn tools() -> Vec<ToolDescriptor> {
    vec![create_directory_tool(), create_post_tool()]
}

/// Parameters for `create_artifact_directory`.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtifactDirectoryParams {
    /// Base name of the artifact; a UTC timestamp is appended.
    pub artifact_name: String,
}

/// Parameters for `create_post_artifact`.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostArtifactParams {
    /// Full artifact directory name, including its timestamp.
    pub artifact_name: String,
    /// File name for the post, for example `launch-post.md`.
    pub file_name: String,
    /// Text content of the post.
    pub file_content: String,
}

fn create_directory_tool() -> ToolDescriptor {
    ToolDescriptor::new::<CreateArtifactDirectoryParams, _, _>(
        "create_artifact_directory",
        "Creates a new artifact directory with screenshots, videos, posts, and gifs \
         subfolders. IMPORTANT: You MUST provide the artifactName parameter. Example: \
         create_artifact_directory({ artifactName: \"ARTIFACT_NAME_WITHOUT_DATETIME\" })",
        GROUPS,
        |_context, params: CreateArtifactDirectoryParams| async move {
            let workspace = workspace_root()?;
            let artifact = promo_core::artifacts::create_artifact_directory(
                &workspace,
                &params.artifact_name,
                Utc::now(),
            )
            .await?;

            let path = artifact.path.display().to_string();
            let mut structure = JsonObject::new();
            structure.insert(
                path.clone(),
                json!({
                    "screenshots": "Directory for screenshot artifacts",
                    "videos": "Directory for screencast artifacts",
                    "posts": "Directory for post artifacts",
                    "gifs": "Directory for GIF artifacts",
                }),
            );

            let response = json!({
                "success": true,
                "artifactPath": path,
                "message": format!("Successfully created artifact directory at {path}"),
                "artifactName": params.artifact_name,
                "structure": structure,
                "nextSteps": [
                    format!("Navigate to {path} to start organizing your artifacts"),
                    "Launch the companion app to start capturing screenshots and screencasts"
                        .to_string(),
                ],
            });
            helpers::json_text(&response)
        },
    )
}

fn create_post_tool() -> ToolDescriptor {
    ToolDescriptor::new::<CreatePostArtifactParams, _, _>(
        "create_post_artifact",
        "Creates a post file inside the posts subfolder of an existing artifact directory. \
         IMPORTANT: You MUST provide the artifactName, fileName, and fileContent parameters. \
         Example: create_post_artifact({ artifactName: \"NAME-2025-01-01T00-00-00\", \
         fileName: \"post.md\", fileContent: \"...\" })",
        GROUPS,
        |_context, params: CreatePostArtifactParams| async move {
            let workspace = workspace_root()?;
            let path = promo_core::artifacts::create_post_artifact(
                &workspace,
                &params.artifact_name,
                &params.file_name,
                &params.file_content,
            )
            .await?;

            let file_path = path.display().to_string();
            let response = json!({
                "success": true,
                "filePath": file_path,
                "message": format!("Successfully created post artifact at {file_path}"),
                "artifactName": params.artifact_name,
                "fileName": params.file_name,
            });
            helpers::json_text(&response)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_tools_register_under_the_artifacts_group() {
        let tools = tools();
        let names: Vec<&str> = tools.iter().map(crate::catalog::ToolDescriptor::name).collect();
        assert_eq!(names, ["create_artifact_directory", "create_post_artifact"]);
        for tool in &tools {
            assert_eq!(tool.groups(), GROUPS);
        }
    }

    #[test]
    fn parameters_use_camel_case_names() {
        let params: CreatePostArtifactParams = serde_json::from_value(json!({
            "artifactName": "demo-2025-05-01T10-00-00",
            "fileName": "post.md",
            "fileContent": "hello",
        }))
        .expect("parameters deserialize");

        assert_eq!(params.artifact_name, "demo-2025-05-01T10-00-00");
        assert_eq!(params.file_name, "post.md");
        assert_eq!(params.file_content, "hello");
    }
}
