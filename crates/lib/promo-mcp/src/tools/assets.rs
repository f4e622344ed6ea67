//! Final asset tools writing into the marketing assets tree.

use promo_core::assets::{create_post_asset, create_research_asset};
use promo_core::gate::ToolGroup;
use promo_core::workspace::workspace_root;
use rmcp::schemars;
use serde::Deserialize;
use serde_json::json;

use crate::catalog::ToolDescriptor;
use crate::helpers;

const GROUPS: &[ToolGroup] = &[ToolGroup::AssetGenerators];

pub fn tools() -> Vec<ToolDescriptor> {
    vec![post_asset_tool(), research_asset_tool()]
}

/// Parameters shared by the asset writers.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateAssetParams {
    /// File name for the asset, for example `launch-post.md`.
    pub name: String,
    /// Text content to write.
    pub content: String,
}

fn post_asset_tool() -> ToolDescriptor {
    ToolDescriptor::new::<CreateAssetParams, _, _>(
        "create_post_asset",
        "Creates a final post file in the marketing assets posts directory. IMPORTANT: You \
         MUST provide the name and content parameters. Example: create_post_asset({ name: \
         \"launch-post.md\", content: \"POST_CONTENT\" })",
        GROUPS,
        |_context, params: CreateAssetParams| async move {
            let workspace = workspace_root()?;
            let asset = create_post_asset(&workspace, &params.name, &params.content).await?;
            asset_response(&asset, "post")
        },
    )
}

fn research_asset_tool() -> ToolDescriptor {
    ToolDescriptor::new::<CreateAssetParams, _, _>(
        "create_research_asset",
        "Creates a research findings file in the marketing assets research directory. \
         IMPORTANT: You MUST provide the name and content parameters. Example: \
         create_research_asset({ name: \"competitor-scan.md\", content: \"RESEARCH_CONTENT\" })",
        GROUPS,
        |_context, params: CreateAssetParams| async move {
            let workspace = workspace_root()?;
            let asset = create_research_asset(&workspace, &params.name, &params.content).await?;
            asset_response(&asset, "research")
        },
    )
}

fn asset_response(
    asset: &promo_core::assets::AssetFile,
    kind: &str,
) -> Result<rmcp::model::CallToolResult, promo_core::error::ToolError> {
    let file_path = asset.path.display().to_string();
    let response = json!({
        "success": true,
        "filePath": file_path,
        "message": format!("Successfully created {kind} asset at {file_path}"),
        "name": asset.name,
        "textLength": asset.text_length,
    });
    helpers::json_text(&response)
}
