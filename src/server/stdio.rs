//! Newline-delimited JSON-RPC server for tool clients.
//!
//! Reads one JSON-RPC request per line, writes one response per line.
//! Runs over any buffered reader/writer pair so tests can drive it
//! through an in-memory duplex instead of real stdio.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::server::rpc::{
    RpcRequest, RpcResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, PROTOCOL_VERSION,
};
use crate::tools::{ToolDispatcher, ToolInvocation};

/// Name reported in the `initialize` response.
const SERVER_NAME: &str = "opendiscourse-mcp";

/// Serves the tool protocol over a line-oriented transport.
#[derive(Debug)]
pub struct StdioServer {
    dispatcher: Arc<ToolDispatcher>,
    cancel: CancellationToken,
}

impl StdioServer {
    pub fn new(dispatcher: Arc<ToolDispatcher>) -> Self {
        Self {
            dispatcher,
            cancel: CancellationToken::new(),
        }
    }

    /// Token observed by the serve loop; cancel it to stop the server.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Requests shutdown. The serve loop exits after the in-flight line.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Runs until EOF on the reader or until cancelled.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("stdio server shutting down");
                    break;
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break; // clean EOF
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Some(response) = self.handle_line(&line).await {
                        write_line(&mut writer, &response).await?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Parses and answers one line. `None` means nothing is written back,
    /// which is the case for every notification.
    async fn handle_line(&self, line: &str) -> Option<RpcResponse> {
        let request: RpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable request line");
                return Some(RpcResponse::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("parse error: {}", e),
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            let id = request.id.unwrap_or(Value::Null);
            return Some(RpcResponse::error(
                id,
                INVALID_REQUEST,
                "jsonrpc must be \"2.0\"",
            ));
        }

        let Some(id) = request.id else {
            tracing::debug!(method = %request.method, "notification consumed");
            return None;
        };

        Some(self.handle_request(id, &request.method, request.params).await)
    }

    async fn handle_request(&self, id: Value, method: &str, params: Value) -> RpcResponse {
        match method {
            "initialize" => RpcResponse::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {}},
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            ),
            "ping" => RpcResponse::success(id, json!({})),
            "tools/list" => {
                let tools: Vec<Value> = self
                    .dispatcher
                    .list_tools()
                    .iter()
                    .map(|def| {
                        json!({
                            "name": def.name,
                            "description": def.description,
                            "inputSchema": def.input_schema.to_json_schema(),
                        })
                    })
                    .collect();
                RpcResponse::success(id, json!({"tools": tools}))
            }
            "tools/call" => {
                let invocation: ToolInvocation = match serde_json::from_value(params) {
                    Ok(invocation) => invocation,
                    Err(e) => {
                        return RpcResponse::error(
                            id,
                            INVALID_PARAMS,
                            format!("invalid params: {}", e),
                        );
                    }
                };
                let result = self.dispatcher.dispatch(invocation).await;
                match serde_json::to_value(&result) {
                    Ok(value) => RpcResponse::success(id, value),
                    Err(e) => {
                        tracing::error!(error = %e, "tool result failed to serialize");
                        RpcResponse::error(id, INTERNAL_ERROR, "internal error")
                    }
                }
            }
            other => {
                RpcResponse::error(id, METHOD_NOT_FOUND, format!("method not found: {}", other))
            }
        }
    }
}

async fn write_line<W>(writer: &mut W, response: &RpcResponse) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(response)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await
}
