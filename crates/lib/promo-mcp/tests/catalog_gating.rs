use std::sync::Arc;

use promo_api::{ApiClient, ApiClientConfig};
use promo_core::gate::EnvSnapshot;
use promo_mcp::PromoMcp;
use promo_mcp::catalog::ToolContext;
use rmcp::model::ErrorCode;

fn snapshot(pairs: &[(&str, &str)]) -> EnvSnapshot {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect()
}

fn server(pairs: &[(&str, &str)]) -> PromoMcp {
    let api = ApiClient::new(ApiClientConfig::default()).expect("client builds");
    let context = Arc::new(ToolContext::new(api));
    PromoMcp::with_snapshot(context, &snapshot(pairs)).expect("catalog should build")
}

#[test]
fn no_switches_exposes_the_full_surface() {
    let server = server(&[]);
    let names = server.tool_names();
    assert_eq!(names.len(), 47);
    assert!(names.contains(&"use_perplexity"));
    assert!(names.contains(&"notion_fetch_data"));
    assert!(names.contains(&"slack_sends_a_message_to_a_slack_channel"));
    assert!(names.contains(&"linear_create_issue"));
    assert!(names.contains(&"scaffold_marketing_project"));
    assert!(!names.contains(&"diagnostic"));
}

#[test]
fn a_group_switch_narrows_the_surface_to_that_group() {
    let server = server(&[("PROMO_MCP_GROUP_RESEARCH", "true")]);
    assert_eq!(
        server.tool_names(),
        ["fetch_reddit_posts", "use_openai_deep_research", "use_perplexity"]
    );
}

#[test]
fn a_tool_switch_exposes_exactly_that_tool() {
    let server = server(&[("PROMO_MCP_TOOL_USE_PERPLEXITY", "true")]);
    assert_eq!(server.tool_names(), ["use_perplexity"]);
}

#[test]
fn group_and_tool_switches_combine_inclusively() {
    let server = server(&[
        ("PROMO_MCP_GROUP_ARTIFACTS", "true"),
        ("PROMO_MCP_TOOL_SCAFFOLD_MARKETING_PROJECT", "true"),
    ]);
    assert_eq!(
        server.tool_names(),
        [
            "create_artifact_directory",
            "create_post_artifact",
            "scaffold_marketing_project",
        ]
    );
}

#[test]
fn switch_values_other_than_true_leave_open_mode_on() {
    for value in ["TRUE", "1", "yes", ""] {
        let server = server(&[("PROMO_MCP_GROUP_RESEARCH", value)]);
        assert_eq!(
            server.tool_names().len(),
            47,
            "value {value:?} should not arm selective mode"
        );
    }
}

#[test]
fn the_debug_switch_adds_the_diagnostic_tool() {
    let server = server(&[("PROMO_MCP_DEBUG", "true")]);
    let names = server.tool_names();
    assert_eq!(names.len(), 48);
    assert!(names.contains(&"diagnostic"));
}

#[test]
fn selective_mode_gates_the_diagnostic_like_any_tool() {
    let debug_only = server(&[
        ("PROMO_MCP_DEBUG", "true"),
        ("PROMO_MCP_GROUP_RESEARCH", "true"),
    ]);
    assert!(!debug_only.tool_names().contains(&"diagnostic"));

    let with_group = server(&[
        ("PROMO_MCP_DEBUG", "true"),
        ("PROMO_MCP_GROUP_DIAGNOSTICS", "true"),
    ]);
    assert_eq!(with_group.tool_names(), ["diagnostic"]);
}

#[tokio::test]
async fn invalid_parameters_return_an_error_envelope() {
    let server = server(&[]);
    let result = server
        .invoke("use_perplexity", Some(serde_json::Map::new()))
        .await
        .expect("validation failures should stay in-band");
    assert_eq!(result.is_error, Some(true));

    let rendered = serde_json::to_value(&result).expect("tool results should serialize");
    let text = rendered["content"][0]["text"]
        .as_str()
        .expect("error envelopes should carry text content");
    assert!(
        text.contains("Error: invalid parameters for use_perplexity"),
        "unexpected envelope text: {text}"
    );
}

#[tokio::test]
async fn unknown_tools_surface_method_not_found() {
    let server = server(&[]);
    let err = server
        .invoke("definitely_not_registered", None)
        .await
        .expect_err("unknown tools should be a host-level error");
    assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);
    assert!(err.message.contains("definitely_not_registered"));
}

#[tokio::test]
async fn gated_out_tools_are_not_invocable() {
    let server = server(&[("PROMO_MCP_TOOL_USE_PERPLEXITY", "true")]);
    let err = server
        .invoke("notion_fetch_data", None)
        .await
        .expect_err("hidden tools should not dispatch");
    assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);
}
