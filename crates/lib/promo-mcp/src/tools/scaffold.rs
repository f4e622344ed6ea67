//! Marketing project scaffolding tool.

use promo_core::gate::ToolGroup;
use promo_core::scaffold::scaffold_marketing_project;
use promo_core::workspace::workspace_root;
use serde_json::json;

use super::EmptyParams;
use crate::catalog::ToolDescriptor;
use crate::helpers;

const GROUPS: &[ToolGroup] = &[ToolGroup::Scaffolding];

pub fn tools() -> Vec<ToolDescriptor> {
    vec![scaffold_tool()]
}

fn scaffold_tool() -> ToolDescriptor {
    ToolDescriptor::new::<EmptyParams, _, _>(
        "scaffold_marketing_project",
        "Create a marketing project directory with assets and artifacts subdirectories. \
         Example: scaffold_marketing_project()",
        GROUPS,
        |_context, _params: EmptyParams| async move {
            let workspace = workspace_root()?;
            let outcome = scaffold_marketing_project(&workspace).await?;
            let project_path = outcome.project_path.display().to_string();
            let response = json!({
                "success": true,
                "projectPath": project_path,
                "message": format!("Successfully created marketing project at {project_path}"),
                "structure": {
                    "marketing": {
                        "artifacts": {
                            "description": "Directory for intermediate materials (screenshots \
                                            and screencast recordings of app functionality)",
                        },
                        "assets": {
                            "description": "Directory for final materials (documentation, \
                                            social media posts, help desk materials, etc.)",
                            "subdirectories": {
                                "posts": {
                                    "description": "Directory for social media posts and content",
                                },
                                "research": {
                                    "description": "Directory for research results",
                                },
                            },
                        },
                    },
                },
                "nextSteps": [
                    format!(
                        "Navigate to {project_path} to start organizing your marketing materials"
                    ),
                    "Create an artifact directory with create_artifact_directory({ \
                     artifactName: \"ARTIFACT_NAME\" }) to stage captured screenshots, \
                     screencasts, and posts"
                        .to_string(),
                ],
            });
            helpers::json_text(&response)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_scaffold_tool_registers_alone() {
        let tools = tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name(), "scaffold_marketing_project");
        assert_eq!(tools[0].flag(), "PROMO_MCP_TOOL_SCAFFOLD_MARKETING_PROJECT");
        assert_eq!(tools[0].groups(), GROUPS);
    }
}
