//! JSON-RPC 2.0 framing for the stdio transport: one message per line.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Requests without an id (or with a null id) expect no response.
    pub fn is_notification(&self) -> bool {
        matches!(self.id, None | Some(Value::Null))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id: id.unwrap_or(Value::Null),
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: id.unwrap_or(Value::Null),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    /// Serializes the response as a single line.
    pub fn encode(&self) -> String {
        match serde_json::to_string(self) {
            Ok(line) => line,
            Err(e) => {
                let fallback = JsonRpcResponse::error(
                    Some(self.id.clone()),
                    INTERNAL_ERROR,
                    format!("Internal error: {}", e),
                );
                serde_json::to_string(&fallback).unwrap_or_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_line_has_result_and_no_error() {
        let resp = JsonRpcResponse::success(Some(json!(3)), json!({ "tools": [] }));
        let line: Value = serde_json::from_str(&resp.encode()).unwrap();
        assert_eq!(line["jsonrpc"], "2.0");
        assert_eq!(line["id"], 3);
        assert_eq!(line["result"]["tools"], json!([]));
        assert!(line.get("error").is_none());
    }

    #[test]
    fn error_without_id_serializes_null_id() {
        let resp = JsonRpcResponse::error(None, PARSE_ERROR, "Parse error");
        let line: Value = serde_json::from_str(&resp.encode()).unwrap();
        assert_eq!(line["id"], Value::Null);
        assert_eq!(line["error"]["code"], PARSE_ERROR);
        assert_eq!(line["error"]["message"], "Parse error");
        assert!(line.get("result").is_none());
    }

    #[test]
    fn encoded_response_is_one_line() {
        let resp = JsonRpcResponse::success(Some(json!("a")), json!({ "text": "x\ny" }));
        assert!(!resp.encode().contains('\n'));
    }

    #[test]
    fn missing_or_null_id_is_notification() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(req.is_notification());

        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
        assert!(req.is_notification());

        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":"a","method":"ping"}"#).unwrap();
        assert!(!req.is_notification());
    }
}
