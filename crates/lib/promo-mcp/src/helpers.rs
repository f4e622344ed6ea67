//! Shared response and error helpers for tool handlers.

use std::borrow::Cow;

use promo_core::error::ToolError;
use promo_core::gate::ToolGroup;
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, ErrorCode, JsonObject};
use rmcp::schemars;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::catalog::{ToolContext, ToolDescriptor};

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub fn error_text(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message.into())])
}

// Responses render as pretty-printed JSON text blocks.
pub fn json_text<T: Serialize>(value: &T) -> Result<CallToolResult, ToolError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| ToolError::system(format!("failed to render response: {err}")))?;
    Ok(CallToolResult::success(vec![Content::text(rendered)]))
}

pub fn text(message: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(message.into())])
}

/// Builds a descriptor for a tool that forwards to the Composio bridge.
pub fn composio_descriptor<P>(
    name: &'static str,
    description: &'static str,
    groups: &'static [ToolGroup],
    service: &'static str,
    slug: &'static str,
) -> ToolDescriptor
where
    P: Serialize + DeserializeOwned + schemars::JsonSchema + Send + Sync + 'static,
{
    ToolDescriptor::new::<P, _, _>(
        name,
        description,
        groups,
        move |context, params: P| async move {
            composio_forward(&context, service, slug, &params).await
        },
    )
}

/// Forwards a tool call to a Composio-connected service.
///
/// A successful outcome renders its result as pretty JSON; a failed
/// outcome or client error becomes an `Error calling <Service> tool:`
/// envelope with the bridge's details appended when present.
pub async fn composio_forward<P: Serialize + Sync>(
    context: &ToolContext,
    service: &str,
    slug: &str,
    params: &P,
) -> Result<CallToolResult, ToolError> {
    let parameters = to_parameter_map(params)?;
    match context.api.composio_call(slug, parameters).await {
        Ok(outcome) if outcome.success => {
            let result = outcome.result.unwrap_or(Value::Null);
            json_text(&result)
        }
        Ok(outcome) => {
            let error = outcome
                .error
                .unwrap_or_else(|| "Unknown error".to_string());
            let message = outcome.details.map_or_else(
                || format!("Error calling {service} tool: {error}"),
                |details| format!("Error calling {service} tool: {error}\nDetails: {details}"),
            );
            Ok(error_text(message))
        }
        Err(err) => Ok(error_text(format!("Error calling {service} tool: {err}"))),
    }
}

fn to_parameter_map<P: Serialize>(params: &P) -> Result<JsonObject, ToolError> {
    match serde_json::to_value(params) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ToolError::system(
            "tool parameters must serialize to an object",
        )),
        Err(err) => Err(ToolError::system(format!(
            "failed to serialize tool parameters: {err}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelopes_are_flagged() {
        let result = error_text("Error: nope");
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn json_responses_are_pretty_printed() {
        let result =
            json_text(&serde_json::json!({ "success": true })).expect("response renders");
        let value = serde_json::to_value(&result).expect("result serializes");
        let body = value["content"][0]["text"].as_str().expect("text content");
        assert!(body.contains('\n'), "expected pretty output, got {body:?}");
        assert!(body.contains("\"success\": true"));
    }

    #[test]
    fn parameter_maps_drop_unset_options() {
        #[derive(Serialize)]
        struct Params {
            channel: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            cursor: Option<String>,
        }

        let map = to_parameter_map(&Params {
            channel: "C123".to_string(),
            cursor: None,
        })
        .expect("params serialize");
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("channel"));
    }
}
