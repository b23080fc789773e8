use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

use crate::dispatch::Dispatcher;
use crate::tools::list_tools;
use crate::transport::{
    JsonRpcRequest, JsonRpcResponse, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR,
};

const SERVER_NAME: &str = "crucible-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const PROTOCOL_VERSION: &str = "2024-11-05";

pub struct McpServer {
    dispatcher: Dispatcher,
    initialized: bool,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Serves newline-delimited requests until `input` reaches EOF.
    ///
    /// A line that is not valid UTF-8 is answered with a parse error; only
    /// I/O failures on the channel itself end the loop.
    pub fn serve<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let resp = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_request(line.trim_end_matches(['\r', '\n'])),
                Err(e) => {
                    warn!(error = %e, "discarding line that is not valid UTF-8");
                    Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error").encode())
                }
            };

            if let Some(resp) = resp {
                writeln!(output, "{}", resp)?;
                output.flush()?;
            }
        }

        info!("input closed, shutting down");
        Ok(())
    }

    pub fn handle_request(&mut self, input: &str) -> Option<String> {
        let message: Value = match serde_json::from_str(input) {
            Ok(v) => v,
            Err(_) => {
                return Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error").encode());
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(r) => r,
            Err(e) => {
                return Some(
                    JsonRpcResponse::error(None, INVALID_REQUEST, format!("Invalid request: {}", e))
                        .encode(),
                );
            }
        };

        debug!(method = %request.method, id = ?request.id, "received request");

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(&request),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                return None;
            }
            "tools/list" => self.handle_tools_list(&request),
            "tools/call" => self.handle_tools_call(&request),
            "ping" => JsonRpcResponse::success(request.id.clone(), json!({})),
            _ => JsonRpcResponse::error(
                request.id.clone(),
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        };

        if request.is_notification() {
            return None;
        }
        Some(response.encode())
    }

    fn handle_initialize(&mut self, request: &JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(
            request.id.clone(),
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": SERVER_VERSION
                }
            }),
        )
    }

    fn handle_tools_list(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let tools = list_tools();
        JsonRpcResponse::success(request.id.clone(), json!({ "tools": tools }))
    }

    fn handle_tools_call(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let params = match &request.params {
            Some(p) if p.is_object() => p,
            _ => {
                return JsonRpcResponse::error(request.id.clone(), INVALID_PARAMS, "Missing params")
            }
        };

        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let result = self.dispatcher.call(name, arguments);
        JsonRpcResponse::success(request.id.clone(), result.to_value())
    }
}
