use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::protocol::{
    CallToolParams, CallToolResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, TextContent,
    DEFAULT_PROTOCOL_VERSION, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    METHOD_NOT_FOUND, PARSE_ERROR, SERVER_NAME,
};
use crate::application::order_result::OrderResult;
use crate::application::order_service::OrderService;
use crate::inbound::tools::{call_tool, tool_definitions};
use pedidos_types::ports::order_repository::OrderRepository;

/// Serves the tool protocol over stdin/stdout, one JSON message per line.
/// Requests are handled in arrival order; stdout carries nothing but responses.
pub struct StdioServer<R>
where
    R: OrderRepository,
{
    pub service: Arc<OrderService<R>>,
}

impl<R> StdioServer<R>
where
    R: OrderRepository,
{
    pub fn new(service: OrderService<R>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!("serving tools over stdio");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Reads requests until EOF, writing one response line per request.
    pub async fn serve<I, O>(&self, mut input: I, mut output: O) -> anyhow::Result<()>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.handle_line(line).await,
                Err(e) => {
                    tracing::warn!(error = %e, "message is not valid UTF-8");
                    Some(JsonRpcResponse::failure(
                        Value::Null,
                        JsonRpcError::new(PARSE_ERROR, format!("Parse error: {e}")),
                    ))
                }
            };
            if let Some(response) = response {
                write_response(&mut output, &response).await?;
            }
        }
        tracing::info!("stdin closed, stopping");
        Ok(())
    }

    /// Handles one raw message. Notifications produce no response.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable message");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {e}")),
                ));
            }
        };
        let request: JsonRpcRequest = match serde_json::from_value(value.clone()) {
            Ok(r) => r,
            Err(e) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                return Some(JsonRpcResponse::failure(
                    id,
                    JsonRpcError::new(INVALID_REQUEST, format!("Invalid request: {e}")),
                ));
            }
        };
        if let Some(version) = request.jsonrpc.as_deref() {
            if version != JSONRPC_VERSION {
                return Some(JsonRpcResponse::failure(
                    request.id.unwrap_or(Value::Null),
                    JsonRpcError::new(
                        INVALID_REQUEST,
                        format!("unsupported jsonrpc version {version}"),
                    ),
                ));
            }
        }

        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "notification");
            return None;
        };

        tracing::info!(method = %request.method, "request");
        let response = match self.dispatch(&request.method, request.params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::failure(id, error),
        };
        Some(response)
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Value, JsonRpcError> {
        match method {
            "initialize" => {
                let version = params
                    .get("protocolVersion")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_PROTOCOL_VERSION);
                Ok(json!({
                    "protocolVersion": version,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }))
            }
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tool_definitions() })),
            "tools/call" => {
                let call: CallToolParams = serde_json::from_value(params)
                    .map_err(|e| JsonRpcError::new(INVALID_PARAMS, e.to_string()))?;
                let result = self.call(call).await;
                serde_json::to_value(result)
                    .map_err(|e| JsonRpcError::new(INTERNAL_ERROR, e.to_string()))
            }
            other => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        }
    }

    async fn call(&self, call: CallToolParams) -> CallToolResult {
        match call_tool(self.service.as_ref(), &call.name, call.arguments).await {
            Ok(result) => order_tool_result(&result),
            Err(e) => {
                tracing::error!(tool = %call.name, error = %e, "tool call failed");
                let body = json!({ "success": false, "error": e.to_string(), "tool": call.name });
                CallToolResult {
                    content: vec![TextContent::text(pretty(&body))],
                    structured_content: None,
                    is_error: true,
                }
            }
        }
    }
}

async fn write_response<O>(output: &mut O, response: &JsonRpcResponse) -> anyhow::Result<()>
where
    O: AsyncWrite + Unpin,
{
    let mut bytes = serde_json::to_vec(response)?;
    bytes.push(b'\n');
    output.write_all(&bytes).await?;
    output.flush().await?;
    Ok(())
}

fn order_tool_result(result: &OrderResult) -> CallToolResult {
    let structured = serde_json::to_value(result).unwrap_or(Value::Null);
    CallToolResult {
        content: vec![TextContent::text(pretty(&structured))],
        structured_content: Some(structured),
        is_error: false,
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
