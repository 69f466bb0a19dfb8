//! Tool dispatch — validation, execution, envelope normalization.
//!
//! `dispatch` is infallible at its boundary: unknown names, argument
//! violations, upstream failures and even panicking handlers all come back
//! as an error envelope. Internal failures are logged in full but surfaced
//! with a generic message.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::registry::{ToolDefinition, ToolRegistry};
use crate::tools::result::ToolResult;
use crate::types::Error;

/// Caller-facing text for failures whose detail stays in the logs.
const INTERNAL_ERROR_TEXT: &str = "unexpected failure handling the tool call";

/// A named tool call with raw JSON arguments.
///
/// `arguments` defaults to an empty object so zero-argument tools accept
/// requests that omit the key entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    #[serde(default = "empty_object")]
    pub arguments: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Dispatcher over one registry.
#[derive(Debug)]
pub struct ToolDispatcher {
    registry: ToolRegistry,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Tool definitions in registration order.
    pub fn list_tools(&self) -> Vec<&ToolDefinition> {
        self.registry.definitions().collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Run one invocation to completion. Always produces an envelope.
    pub async fn dispatch(&self, invocation: ToolInvocation) -> ToolResult {
        let invocation_id = format!("inv_{}", uuid::Uuid::new_v4().simple());
        let ToolInvocation { name, arguments } = invocation;

        let (definition, handler) = match self.registry.resolve(&name) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(invocation = %invocation_id, tool = %name, "unknown tool");
                return ToolResult::error(err.to_string());
            }
        };

        let violations = definition.input_schema.validate(&arguments);
        if !violations.is_empty() {
            tracing::warn!(
                invocation = %invocation_id,
                tool = %name,
                violations = violations.len(),
                "arguments rejected"
            );
            return ToolResult::error(Error::invalid_argument(violations.join("; ")).to_string());
        }

        tracing::debug!(invocation = %invocation_id, tool = %name, "dispatching");

        let outcome = AssertUnwindSafe(handler(arguments)).catch_unwind().await;
        match outcome {
            Ok(Ok(value)) => match ToolResult::success_json(&value) {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!(
                        invocation = %invocation_id,
                        tool = %name,
                        error = %err,
                        "result serialization failed"
                    );
                    ToolResult::error(Error::internal(INTERNAL_ERROR_TEXT).to_string())
                }
            },
            Ok(Err(Error::Internal(detail))) => {
                tracing::error!(
                    invocation = %invocation_id,
                    tool = %name,
                    %detail,
                    "internal error"
                );
                ToolResult::error(Error::internal(INTERNAL_ERROR_TEXT).to_string())
            }
            Ok(Err(err)) => {
                tracing::warn!(
                    invocation = %invocation_id,
                    tool = %name,
                    error = %err,
                    "tool failed"
                );
                ToolResult::error(err.to_string())
            }
            Err(panic) => {
                tracing::error!(
                    invocation = %invocation_id,
                    tool = %name,
                    detail = %panic_message(panic.as_ref()),
                    "handler panicked"
                );
                ToolResult::error(Error::internal(INTERNAL_ERROR_TEXT).to_string())
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
