//! Stdio transport integration tests — full JSON-RPC sessions through an
//! in-memory duplex pipe, including malformed input and shutdown paths.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf};
use tokio::task::JoinHandle;

use opendiscourse_core::server::StdioServer;
use opendiscourse_core::tools::{
    handler, FieldType, InputSchema, ToolDefinition, ToolDispatcher, ToolRegistry,
};

type ClientReader = tokio::io::Lines<BufReader<ReadHalf<DuplexStream>>>;
type ClientWriter = WriteHalf<DuplexStream>;
type ServeTask = JoinHandle<std::io::Result<()>>;

/// Helper: spin up a server over an in-memory pipe with one echo tool.
fn start_session() -> (Arc<StdioServer>, ClientWriter, ClientReader, ServeTask) {
    let mut registry = ToolRegistry::new();
    registry
        .register(
            ToolDefinition::new(
                "echo",
                "Echoes its arguments.",
                InputSchema::new().optional("marker", FieldType::integer(), "Echo payload"),
            ),
            handler(|args| async move { Ok(args) }),
        )
        .unwrap();
    let server = Arc::new(StdioServer::new(Arc::new(ToolDispatcher::new(registry))));

    let (client_io, server_io) = tokio::io::duplex(64 * 1024);
    let (client_read, client_write) = tokio::io::split(client_io);
    let task = tokio::spawn({
        let server = Arc::clone(&server);
        async move {
            let (server_read, server_write) = tokio::io::split(server_io);
            server.serve(BufReader::new(server_read), server_write).await
        }
    });

    let reader = BufReader::new(client_read).lines();
    (server, client_write, reader, task)
}

/// Helper: write one request line, read and decode one response line.
async fn round_trip(writer: &mut ClientWriter, reader: &mut ClientReader, request: Value) -> Value {
    send(writer, &request).await;
    let line = reader.next_line().await.unwrap().unwrap();
    serde_json::from_str(&line).unwrap()
}

async fn send(writer: &mut ClientWriter, request: &Value) {
    let mut line = serde_json::to_vec(request).unwrap();
    line.push(b'\n');
    writer.write_all(&line).await.unwrap();
}

#[tokio::test]
async fn test_full_session_round_trip() {
    let (_server, mut writer, mut reader, task) = start_session();

    // initialize
    let response = round_trip(
        &mut writer,
        &mut reader,
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
    )
    .await;
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(response["result"]["serverInfo"]["name"], "opendiscourse-mcp");

    // The initialized notification produces no response; the next line on
    // the wire must be the answer to the ping that follows it.
    send(
        &mut writer,
        &json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    )
    .await;
    let response = round_trip(
        &mut writer,
        &mut reader,
        json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}),
    )
    .await;
    assert_eq!(response["id"], 2);
    assert_eq!(response["result"], json!({}));

    // tools/list
    let response = round_trip(
        &mut writer,
        &mut reader,
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/list"}),
    )
    .await;
    let tools = &response["result"]["tools"];
    assert_eq!(tools[0]["name"], "echo");
    assert_eq!(tools[0]["inputSchema"]["type"], "object");

    // tools/call
    let response = round_trip(
        &mut writer,
        &mut reader,
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {"name": "echo", "arguments": {"marker": 7}},
        }),
    )
    .await;
    assert_eq!(response["id"], 4);
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    assert_eq!(text, "{\n  \"marker\": 7\n}");
    assert!(response["result"].get("isError").is_none());

    // EOF shuts the loop down cleanly
    writer.shutdown().await.unwrap();
    let served = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap();
    assert!(served.is_ok());
}

#[tokio::test]
async fn test_parse_error_then_recovery() {
    let (_server, mut writer, mut reader, _task) = start_session();

    writer.write_all(b"{this is not json\n").await.unwrap();
    let line = reader.next_line().await.unwrap().unwrap();
    let response: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(response["id"], Value::Null);
    assert_eq!(response["error"]["code"], -32700);

    // The loop keeps serving after a bad line.
    let response = round_trip(
        &mut writer,
        &mut reader,
        json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}),
    )
    .await;
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn test_unknown_method_answered_not_fatal() {
    let (_server, mut writer, mut reader, _task) = start_session();

    let response = round_trip(
        &mut writer,
        &mut reader,
        json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}),
    )
    .await;
    assert_eq!(response["error"]["code"], -32601);

    let response = round_trip(
        &mut writer,
        &mut reader,
        json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}),
    )
    .await;
    assert_eq!(response["result"], json!({}));
}

#[tokio::test]
async fn test_blank_lines_ignored() {
    let (_server, mut writer, mut reader, _task) = start_session();

    writer.write_all(b"\n  \n").await.unwrap();
    let response = round_trip(
        &mut writer,
        &mut reader,
        json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}),
    )
    .await;
    assert_eq!(response["id"], 1);
}

#[tokio::test]
async fn test_shutdown_token_stops_serve_loop() {
    let (server, _writer, _reader, task) = start_session();

    server.shutdown();
    let served = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap();
    assert!(served.is_ok());
}
