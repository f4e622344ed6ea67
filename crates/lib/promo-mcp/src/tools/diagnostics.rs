//! Debug-only diagnostic tool reporting on the server environment.
//!
//! Registered only when `PROMO_MCP_DEBUG` is set to exactly `true`. The
//! report covers system details, the relevant environment variables, tool
//! enablement state and companion app availability.

use std::sync::Arc;

use chrono::Utc;
use promo_core::companion::companion_binary_available;
use promo_core::error::ToolError;
use promo_core::gate::{
    DEBUG_FLAG, EnablementGate, EnvSnapshot, GROUP_FLAG_PREFIX, TOOL_FLAG_PREFIX, ToolGroup,
};
use promo_core::workspace::WORKSPACE_ENV_VAR;
use rmcp::model::CallToolResult;
use rmcp::schemars;
use serde::Deserialize;

use crate::catalog::{ToolContext, ToolDescriptor};
use crate::helpers;

const GROUPS: &[ToolGroup] = &[ToolGroup::Diagnostics];

pub fn tool() -> ToolDescriptor {
    ToolDescriptor::new::<DiagnosticParams, _, _>(
        "diagnostic",
        "Provides comprehensive information about the MCP server environment, available \
         dependencies, and configuration status.",
        GROUPS,
        run_diagnostic,
    )
}

/// Parameters for `diagnostic`.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DiagnosticParams {
    /// Optional: dummy parameter to satisfy MCP protocol
    #[serde(default)]
    #[allow(dead_code)]
    pub enabled: Option<bool>,
}

async fn run_diagnostic(
    _context: Arc<ToolContext>,
    _params: DiagnosticParams,
) -> Result<CallToolResult, ToolError> {
    tracing::info!("running diagnostic tool");
    let snapshot = EnvSnapshot::from_process_env();
    Ok(helpers::text(diagnostic_report(&snapshot)))
}

fn diagnostic_report(snapshot: &EnvSnapshot) -> String {
    let gate = EnablementGate::new(snapshot.clone());

    let mut lines = vec![
        "# Promo Studio MCP Diagnostic Report".to_string(),
        format!("\nGenerated: {}", Utc::now().to_rfc3339()),
        format!("Server Version: {}", env!("CARGO_PKG_VERSION")),
        "\n## System Information".to_string(),
        format!("- platform: {}", std::env::consts::OS),
        format!("- arch: {}", std::env::consts::ARCH),
        format!("- pid: {}", std::process::id()),
    ];
    lines.push(std::env::current_exe().map_or_else(
        |_| "- executable: (unknown)".to_string(),
        |exe| format!("- executable: {}", exe.display()),
    ));
    lines.push(std::env::current_dir().map_or_else(
        |_| "- working directory: (unknown)".to_string(),
        |dir| format!("- working directory: {}", dir.display()),
    ));

    lines.push("\n## Environment Variables".to_string());
    for name in [DEBUG_FLAG, WORKSPACE_ENV_VAR, "PROMO_API_URL", "HOME", "USER", "TMPDIR"] {
        lines.push(snapshot.get(name).map_or_else(
            || format!("- {name}: (not set)"),
            |value| format!("- {name}: {value}"),
        ));
    }
    // Presence only; the token value never belongs in a report.
    let token = if snapshot.get("PROMO_API_TOKEN").is_some() { "(set)" } else { "(not set)" };
    lines.push(format!("- PROMO_API_TOKEN: {token}"));
    for (name, value) in snapshot.entries() {
        if name.starts_with("PROMO_MCP_") && name != DEBUG_FLAG {
            lines.push(format!("- {name}: {value}"));
        }
    }

    lines.push("\n### PATH".to_string());
    lines.push("```".to_string());
    let path_entries: Vec<String> = snapshot.get("PATH").map_or_else(
        || vec!["(not set)".to_string()],
        |path| path.split(':').map(str::to_string).collect(),
    );
    lines.extend(path_entries);
    lines.push("```".to_string());

    lines.push("\n## Tools Status".to_string());
    lines.push("\n### Tool Groups Status".to_string());
    if gate.selective_mode_active() {
        for group in ToolGroup::ALL {
            let switch = group.switch_name();
            let display = switch.strip_prefix(GROUP_FLAG_PREFIX).unwrap_or(switch);
            let status = if gate.group_enabled(group) { "Enabled" } else { "Disabled" };
            lines.push(format!("- {display}: {status} (Set with {switch}=true)"));
        }
    } else {
        lines.push("- All tool groups are enabled (selective mode is disabled).".to_string());
    }

    lines.push("\n### Individually Enabled Tools".to_string());
    if gate.selective_mode_active() {
        let tools: Vec<&str> = snapshot
            .entries()
            .filter(|(name, _)| name.starts_with(TOOL_FLAG_PREFIX) && gate.tool_enabled(name))
            .map(|(name, _)| name.strip_prefix(TOOL_FLAG_PREFIX).unwrap_or(name))
            .collect();
        if tools.is_empty() {
            lines.push("- No tools are individually enabled via environment variables.".to_string());
        } else {
            for tool in tools {
                lines.push(format!("- {tool}: Enabled (via {TOOL_FLAG_PREFIX}{tool}=true)"));
            }
        }
    } else {
        lines.push("- All tools are enabled (selective mode is disabled).".to_string());
    }

    lines.push("\n## Utility Availability Summary".to_string());
    let companion = if companion_binary_available() { "Available" } else { "Not available" };
    lines.push(format!("- Companion App: {companion}"));

    lines.push("\n## Troubleshooting Tips".to_string());
    lines.push("- Ensure the companion app is installed".to_string());
    lines.push(format!(
        "- To enable specific tool groups, set the appropriate environment variables (e.g., \
         `export {GROUP_FLAG_PREFIX}RESEARCH=true`)"
    ));
    lines.push(
        "- If you're having issues with environment variables, make sure to use the correct \
         prefix:"
            .to_string(),
    );
    lines.push(format!("  - Use `{GROUP_FLAG_PREFIX}NAME=true` to enable a tool group"));
    lines.push(format!("  - Use `{TOOL_FLAG_PREFIX}NAME=true` to enable an individual tool"));
    lines.push(format!(
        "  - Common mistake: Using `PROMO_MCP_ASSET_GENERATORS=true` instead of \
         `{GROUP_FLAG_PREFIX}ASSET_GENERATORS=true`"
    ));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, &str)]) -> EnvSnapshot {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn the_descriptor_registers_under_diagnostics() {
        let descriptor = tool();
        assert_eq!(descriptor.name(), "diagnostic");
        assert_eq!(descriptor.groups(), GROUPS);
        assert_eq!(descriptor.flag(), "PROMO_MCP_TOOL_DIAGNOSTIC");
    }

    #[test]
    fn selective_reports_name_every_group_switch() {
        let report = diagnostic_report(&snapshot(&[("PROMO_MCP_GROUP_RESEARCH", "true")]));
        assert!(report.contains("### Tool Groups Status"));
        assert!(report.contains("- RESEARCH: Enabled (Set with PROMO_MCP_GROUP_RESEARCH=true)"));
        assert!(report.contains("- NOTION: Disabled (Set with PROMO_MCP_GROUP_NOTION=true)"));
        assert!(report.contains("- No tools are individually enabled via environment variables."));
    }

    #[test]
    fn open_mode_reports_everything_enabled() {
        let report = diagnostic_report(&snapshot(&[]));
        assert!(report.contains("- All tool groups are enabled (selective mode is disabled)."));
        assert!(report.contains("- All tools are enabled (selective mode is disabled)."));
    }

    #[test]
    fn individually_enabled_tools_are_listed_by_switch() {
        let report = diagnostic_report(&snapshot(&[("PROMO_MCP_TOOL_USE_PERPLEXITY", "true")]));
        assert!(
            report.contains("- USE_PERPLEXITY: Enabled (via PROMO_MCP_TOOL_USE_PERPLEXITY=true)")
        );
    }
}
