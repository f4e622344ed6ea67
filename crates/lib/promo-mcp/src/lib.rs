//! MCP server implementation for promo-mcp.
//!
//! This crate wires the Promo Studio tool catalog into an rmcp server and
//! exposes the stdio and streamable HTTP runners. Which tools the server
//! offers is decided once at construction from an environment snapshot.

pub mod catalog;
mod helpers;
pub mod server;
mod tools;

use std::sync::Arc;

use promo_core::gate::{EnablementGate, EnvSnapshot};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams,
    ServerCapabilities, ServerInfo,
};
use rmcp::{ErrorData, RoleServer, ServerHandler, service::RequestContext};

use crate::catalog::{Catalog, CatalogError, ToolContext};

const SERVER_INSTRUCTIONS: &str = r"promo-mcp provides MCP tools for producing promotional content for the project open in your workspace.

Workflow:
1. Scaffold the content area once with `scaffold_marketing_project`.
2. Capture raw material: check the companion app with `check_companion_app_status`,
   then `launch_companion_app` to record screenshots and screencasts into
   `promo.studio/`. Stop it with `stop_companion_app` when done.
3. Turn screencasts into content:
   - `analyze_screencasts` describes what happens in each recording.
   - `generate_gif` cuts a GIF from a time range.
   - `enhance_audio` replaces the narration with a cleaned-up voice track.
4. Research with `use_perplexity`, `use_openai_deep_research`, and
   `fetch_reddit_posts`; save findings via `create_research_asset`.
5. Draft posts with `create_post_asset`, or stage them per capture session
   with `create_artifact_directory` and `create_post_artifact`.
6. Publish and track through the Notion, Slack, and Linear tools.

Notes:
- Video tools shell out to ffmpeg/ffprobe; `install_brew_and_ffmpeg` sets them up.
- Research, analysis, and the Notion/Slack/Linear bridges need PROMO_API_TOKEN.
- Set PROMO_MCP_GROUP_<NAME>=true or PROMO_MCP_TOOL_<NAME>=true to expose only
  some tools; with no switches set, everything is available.";

/// MCP server wrapper around the gated tool catalog.
#[derive(Clone)]
pub struct PromoMcp {
    catalog: Arc<Catalog>,
    context: Arc<ToolContext>,
}

impl PromoMcp {
    /// Creates a server whose tool surface follows the process environment.
    ///
    /// # Errors
    /// Returns `CatalogError` if two tools share a name.
    pub fn new(context: Arc<ToolContext>) -> Result<Self, CatalogError> {
        Self::with_snapshot(context, &EnvSnapshot::from_process_env())
    }

    /// Creates a server from an explicit environment snapshot.
    ///
    /// # Errors
    /// Returns `CatalogError` if two tools share a name.
    pub fn with_snapshot(
        context: Arc<ToolContext>,
        snapshot: &EnvSnapshot,
    ) -> Result<Self, CatalogError> {
        let gate = EnablementGate::new(snapshot.clone());
        let catalog = Catalog::register_all(tools::registry(snapshot), &gate)?;
        tracing::info!(tools = catalog.len(), "tool catalog built");
        Ok(Self {
            catalog: Arc::new(catalog),
            context,
        })
    }

    /// Names of the registered tools, sorted.
    #[must_use]
    pub fn tool_names(&self) -> Vec<&'static str> {
        let mut names = self.catalog.names();
        names.sort_unstable();
        names
    }

    /// Dispatches one tool call against the catalog.
    ///
    /// # Errors
    /// Returns `ErrorData` when no registered tool matches the name.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Option<rmcp::model::JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        self.catalog
            .invoke(Arc::clone(&self.context), name, arguments)
            .await
    }
}

impl ServerHandler for PromoMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.catalog.tools(),
            ..Default::default()
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(&request.name, request.arguments).await
    }
}
