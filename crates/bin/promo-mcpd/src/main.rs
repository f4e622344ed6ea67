//! Daemon entry point for the Promo Studio MCP server.
//!
//! Loads configuration from CLI arguments and the environment, builds the
//! shared web API client, and serves the MCP protocol over stdio and/or
//! streamable HTTP. Logs go to stderr so stdout stays clean for the
//! stdio transport.

mod config;

use std::sync::Arc;

use promo_api::ApiClient;
use promo_core::gate::EnvSnapshot;
use promo_mcp::catalog::ToolContext;
use promo_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing_subscriber::EnvFilter;

use crate::config::PromoConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = PromoConfig::from_args()?;
    init_tracing();

    let api = ApiClient::new(config.api_client_config())?;
    let context = Arc::new(ToolContext::new(api));

    if config.serve_http {
        tracing::info!(addr = %config.http_addr, "serving MCP over streamable HTTP");
        let http_config = McpHttpServerConfig::new(config.http_addr);
        if config.serve_stdio {
            let http_context = Arc::clone(&context);
            tokio::spawn(async move {
                if let Err(err) = serve_streamable_http(http_context, http_config).await {
                    tracing::error!(error = %err, "streamable HTTP server stopped");
                }
            });
        } else {
            serve_streamable_http(context, http_config).await?;
            return Ok(());
        }
    }

    tracing::info!("serving MCP over stdio");
    serve_stdio(context).await?;
    Ok(())
}

fn init_tracing() {
    let default_level = if EnvSnapshot::from_process_env().debug_enabled() {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
