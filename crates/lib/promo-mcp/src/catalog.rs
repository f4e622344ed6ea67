//! Tool descriptors, enablement gating, and dispatch.

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use promo_api::ApiClient;
use promo_core::error::ToolError;
use promo_core::gate::{EnablementGate, TOOL_FLAG_PREFIX, ToolGroup};
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, ErrorCode, JsonObject, Tool};
use rmcp::schemars;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::helpers;

pub type ToolHandlerFuture =
    Pin<Box<dyn Future<Output = Result<CallToolResult, ToolError>> + Send>>;
pub type ToolHandlerFn =
    Arc<dyn Fn(Arc<ToolContext>, JsonObject) -> ToolHandlerFuture + Send + Sync>;

/// Shared state handed to every tool handler.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub api: ApiClient,
}

impl ToolContext {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

/// A registrable tool: metadata, schema, switches, and handler.
///
/// The handler wrapper deserializes the raw arguments before the
/// domain handler runs; a failed parse becomes an error envelope
/// naming the offending parameter and the handler is never entered.
pub struct ToolDescriptor {
    name: &'static str,
    description: &'static str,
    groups: &'static [ToolGroup],
    flag: String,
    input_schema: Arc<JsonObject>,
    handler: ToolHandlerFn,
}

impl ToolDescriptor {
    #[must_use]
    pub fn new<P, F, Fut>(
        name: &'static str,
        description: &'static str,
        groups: &'static [ToolGroup],
        run: F,
    ) -> Self
    where
        P: DeserializeOwned + schemars::JsonSchema + Send + 'static,
        F: Fn(Arc<ToolContext>, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallToolResult, ToolError>> + Send + 'static,
    {
        let flag = format!("{TOOL_FLAG_PREFIX}{}", name.to_ascii_uppercase());
        let input_schema = input_schema_for::<P>();
        let handler: ToolHandlerFn =
            Arc::new(move |context, arguments| -> ToolHandlerFuture {
                let params = match serde_json::from_value::<P>(Value::Object(arguments)) {
                    Ok(params) => params,
                    Err(err) => {
                        let message = format!("invalid parameters for {name}: {err}");
                        return Box::pin(std::future::ready(Err(ToolError::validation(message))));
                    }
                };
                Box::pin(run(context, params))
            });
        Self {
            name,
            description,
            groups,
            flag,
            input_schema,
            handler,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn groups(&self) -> &'static [ToolGroup] {
        self.groups
    }

    #[must_use]
    pub fn flag(&self) -> &str {
        &self.flag
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("groups", &self.groups)
            .field("flag", &self.flag)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

/// Error raised while building the tool catalog.
#[derive(Debug)]
pub enum CatalogError {
    DuplicateName(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "duplicate tool name: {name}"),
        }
    }
}

impl Error for CatalogError {}

/// The registered tool set after gating, indexed by name.
#[derive(Debug)]
pub struct Catalog {
    descriptors: Vec<ToolDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl Catalog {
    /// Validates the full descriptor set, then registers the tools the
    /// gate allows. Duplicate names abort registration outright, even
    /// between tools the gate would have skipped.
    ///
    /// # Errors
    /// Returns `CatalogError` if two descriptors share a name.
    pub fn register_all(
        descriptors: Vec<ToolDescriptor>,
        gate: &EnablementGate,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            if !seen.insert(descriptor.name) {
                return Err(CatalogError::DuplicateName(descriptor.name.to_string()));
            }
        }

        let mut registered = Vec::new();
        let mut index = HashMap::new();
        for descriptor in descriptors {
            if gate.should_register(&descriptor.flag, descriptor.groups) {
                tracing::debug!(tool = descriptor.name, "registering tool");
                index.insert(descriptor.name, registered.len());
                registered.push(descriptor);
            } else {
                tracing::debug!(tool = descriptor.name, "skipping disabled tool");
            }
        }

        Ok(Self {
            descriptors: registered,
            index,
        })
    }

    /// Wire descriptors for `tools/list`, in registration order.
    #[must_use]
    pub fn tools(&self) -> Vec<Tool> {
        self.descriptors
            .iter()
            .map(|descriptor| {
                Tool::new(
                    descriptor.name,
                    descriptor.description,
                    Arc::clone(&descriptor.input_schema),
                )
            })
            .collect()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.descriptors
            .iter()
            .map(|descriptor| descriptor.name)
            .collect()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Dispatches a `tools/call` request.
    ///
    /// Handler failures, including argument validation, come back as
    /// error envelopes inside an `Ok`; only an unregistered tool name
    /// surfaces as a protocol-level error.
    ///
    /// # Errors
    /// Returns `ErrorData` when no registered tool matches `name`.
    pub async fn invoke(
        &self,
        context: Arc<ToolContext>,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let Some(descriptor) = self.index.get(name).map(|&slot| &self.descriptors[slot]) else {
            return Err(helpers::mcp_err(
                ErrorCode::METHOD_NOT_FOUND,
                format!("tool not found: {name}"),
            ));
        };

        (descriptor.handler)(context, arguments.unwrap_or_default())
            .await
            .or_else(|err| {
                tracing::debug!(tool = name, "tool failed: {err}");
                Ok(helpers::error_text(format!("Error: {err}")))
            })
    }
}

fn input_schema_for<P: schemars::JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(P);
    match serde_json::to_value(schema) {
        Ok(Value::Object(object)) => Arc::new(object),
        _ => Arc::new(JsonObject::default()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use promo_api::ApiClientConfig;
    use rmcp::model::Content;
    use serde::{Deserialize, Serialize};

    use super::*;

    /// Parameters for the test echo tool.
    #[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
    struct EchoParams {
        message: String,
    }

    fn test_context() -> Arc<ToolContext> {
        let api = ApiClient::new(ApiClientConfig::default()).expect("client builds");
        Arc::new(ToolContext::new(api))
    }

    fn echo_descriptor(calls: Arc<AtomicUsize>) -> ToolDescriptor {
        ToolDescriptor::new::<EchoParams, _, _>(
            "echo",
            "Echo the message back.",
            &[ToolGroup::Research],
            move |_context, params: EchoParams| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(CallToolResult::success(vec![Content::text(params.message)]))
                }
            },
        )
    }

    fn failing_descriptor() -> ToolDescriptor {
        ToolDescriptor::new::<EchoParams, _, _>(
            "always_fails",
            "Fail on every call.",
            &[ToolGroup::Research],
            |_context, _params: EchoParams| async {
                Err(ToolError::system("disk on fire"))
            },
        )
    }

    fn result_text(result: &CallToolResult) -> String {
        let value = serde_json::to_value(result).expect("result serializes");
        value["content"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    fn args(raw: Value) -> Option<JsonObject> {
        match raw {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    #[test]
    fn flags_derive_from_tool_names() {
        let descriptor = echo_descriptor(Arc::new(AtomicUsize::new(0)));
        assert_eq!(descriptor.flag(), "PROMO_MCP_TOOL_ECHO");
    }

    #[test]
    fn duplicate_names_abort_registration() {
        let descriptors = vec![
            echo_descriptor(Arc::new(AtomicUsize::new(0))),
            echo_descriptor(Arc::new(AtomicUsize::new(0))),
        ];
        let gate = EnablementGate::new(std::iter::empty().collect());

        let err = Catalog::register_all(descriptors, &gate).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(name) if name == "echo"));
    }

    #[tokio::test]
    async fn invalid_arguments_never_reach_the_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = EnablementGate::new(std::iter::empty().collect());
        let catalog =
            Catalog::register_all(vec![echo_descriptor(Arc::clone(&calls))], &gate)
                .expect("catalog builds");

        let result = catalog
            .invoke(test_context(), "echo", args(serde_json::json!({})))
            .await
            .expect("dispatch succeeds");

        assert_eq!(result.is_error, Some(true));
        let text = result_text(&result);
        assert!(text.contains("invalid parameters for echo"), "got {text:?}");
        assert!(text.contains("message"), "got {text:?}");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handler_failures_become_error_envelopes() {
        let gate = EnablementGate::new(std::iter::empty().collect());
        let catalog = Catalog::register_all(vec![failing_descriptor()], &gate)
            .expect("catalog builds");

        let result = catalog
            .invoke(
                test_context(),
                "always_fails",
                args(serde_json::json!({ "message": "hi" })),
            )
            .await
            .expect("dispatch succeeds");

        assert_eq!(result.is_error, Some(true));
        assert_eq!(result_text(&result), "Error: disk on fire");
    }

    #[tokio::test]
    async fn successful_calls_pass_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = EnablementGate::new(std::iter::empty().collect());
        let catalog =
            Catalog::register_all(vec![echo_descriptor(Arc::clone(&calls))], &gate)
                .expect("catalog builds");

        let result = catalog
            .invoke(
                test_context(),
                "echo",
                args(serde_json::json!({ "message": "hi" })),
            )
            .await
            .expect("dispatch succeeds");

        assert_ne!(result.is_error, Some(true));
        assert_eq!(result_text(&result), "hi");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_tools_are_protocol_errors() {
        let gate = EnablementGate::new(std::iter::empty().collect());
        let catalog = Catalog::register_all(Vec::new(), &gate).expect("catalog builds");

        let err = catalog
            .invoke(test_context(), "missing_tool", None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);
        assert!(err.message.contains("missing_tool"));
    }

    #[test]
    fn the_gate_filters_registration() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = EnablementGate::new(
            [(
                "PROMO_MCP_GROUP_SLACK".to_string(),
                "true".to_string(),
            )]
            .into_iter()
            .collect(),
        );

        let catalog = Catalog::register_all(vec![echo_descriptor(calls)], &gate)
            .expect("catalog builds");
        assert!(catalog.is_empty());
        assert!(!catalog.contains("echo"));
    }

    #[test]
    fn schemas_describe_the_parameter_object() {
        let descriptor = echo_descriptor(Arc::new(AtomicUsize::new(0)));
        let schema = serde_json::to_value(descriptor.input_schema.as_ref())
            .expect("schema serializes");
        assert!(schema["properties"]["message"].is_object());
    }
}
