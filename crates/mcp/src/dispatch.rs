use crucible_client::{ApiError, CrucibleApi};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::tools;

/// Rendered in place of an empty string when a call returns nothing.
pub const NO_RETURN_VALUE: &str = "Operation completed successfully (no return value)";

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(
        "Crucible client not initialized. Please set CRUCIBLE_API_URL and CRUCIBLE_API_KEY environment variables."
    )]
    NotInitialized,
    #[error("Unknown tool '{name}'")]
    UnknownTool { name: String },
    #[error("{source}")]
    InvalidArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{source}")]
    Api {
        tool: String,
        #[source]
        source: ApiError,
    },
}

impl ToolError {
    pub fn api(tool: &str, source: ApiError) -> Self {
        Self::Api {
            tool: tool.to_string(),
            source,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::NotInitialized => "not_initialized",
            ToolError::UnknownTool { .. } => "unknown_tool",
            ToolError::InvalidArguments { .. } => "invalid_arguments",
            ToolError::Api { .. } => "downstream",
        }
    }

    /// The text returned to the MCP client.
    pub fn message(&self) -> String {
        match self {
            ToolError::NotInitialized | ToolError::UnknownTool { .. } => format!("Error: {}", self),
            ToolError::InvalidArguments { tool, source } => {
                format!("Error executing {}: {}", tool, source)
            }
            ToolError::Api { tool, source } => format!("Error executing {}: {}", tool, source),
        }
    }
}

/// Content of a `tools/call` response.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub text: String,
    pub error_kind: Option<&'static str>,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error_kind: None,
        }
    }

    pub fn error(err: &ToolError) -> Self {
        Self {
            text: err.message(),
            error_kind: Some(err.kind()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_kind.is_some()
    }

    pub fn to_value(&self) -> Value {
        let mut result = json!({
            "content": [{
                "type": "text",
                "text": self.text
            }]
        });
        if let Some(kind) = self.error_kind {
            result["isError"] = json!(true);
            result["metadata"] = json!({ "error_kind": kind });
        }
        result
    }
}

/// Renders a client return value as indented JSON text.
pub fn render(value: &Value) -> String {
    if value.is_null() {
        return NO_RETURN_VALUE.to_string();
    }
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Routes tool calls to the one client instance built at startup.
#[derive(Clone)]
pub struct Dispatcher {
    client: Option<Arc<dyn CrucibleApi>>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn CrucibleApi>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// A dispatcher with no client; every call reports the missing configuration.
    pub fn uninitialized() -> Self {
        Self { client: None }
    }

    pub fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    pub fn dispatch(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let client = self.client.as_deref().ok_or(ToolError::NotInitialized)?;
        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };
        debug!(tool = name, "dispatching tool call");
        tools::call_tool(client, name, arguments)
    }

    pub fn call(&self, name: &str, arguments: Value) -> ToolResult {
        match self.dispatch(name, arguments) {
            Ok(value) => ToolResult::text(render(&value)),
            Err(err) => {
                warn!(tool = name, kind = err.kind(), error = %err, "tool call failed");
                ToolResult::error(&err)
            }
        }
    }
}
