//! End-to-end MCP requests against the API stub

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use common::{HASH, SEARCH_BODY, STATS_BODY, StubServer};
use torrentclaw_mcp::server::McpServer;
use torrentclaw_mcp::tools;

fn server(stub: &StubServer) -> McpServer {
    McpServer::new(Arc::new(stub.client()))
}

async fn call(server: &McpServer, name: &str, arguments: Value) -> Value {
    let msg = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    });
    let resp = server.handle_value(&msg).await.unwrap();
    serde_json::to_value(resp).unwrap()["result"].clone()
}

fn text(result: &Value) -> &str {
    result["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn search_content_renders_results() {
    let stub = StubServer::builder()
        .reply("GET", "/api/v1/search", 200, SEARCH_BODY)
        .start()
        .await;
    let server = server(&stub);

    let result = call(&server, "search_content", json!({"query": "Dune", "compact": true})).await;

    assert!(result.get("isError").is_none());
    let body = text(&result);
    assert!(body.starts_with("Found 1 results (page 1, showing 1):"), "{body}");
    assert!(body.contains("1. Dune (2021) [movie]"));
    assert!(body.contains("1080p (1.0 GB) | 120 seeders | Score: 85"));
    assert!(body.contains(&format!("Magnet: magnet:?xt=urn:btih:{HASH}")));
    assert!(!body.contains("tr=udp"));
    assert_eq!(
        stub.last_request().query.as_deref(),
        Some("q=Dune&sort=relevance&limit=20")
    );
}

#[tokio::test]
async fn invalid_arguments_never_reach_upstream() {
    let stub = StubServer::builder().start().await;
    let server = server(&stub);

    let result = call(&server, "search_content", json!({"query": "Dune", "quality": "4k"})).await;

    assert_eq!(result["isError"], true);
    assert!(text(&result).starts_with("Invalid arguments: quality must be one of"));
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn api_errors_become_tool_errors() {
    let stub = StubServer::builder()
        .reply("GET", "/api/v1/popular", 429, "{}")
        .start()
        .await;
    let server = server(&stub);

    let result = call(&server, "get_popular", json!({})).await;

    assert_eq!(result["isError"], true);
    assert_eq!(
        text(&result),
        "TorrentClaw API error (429): Rate limit exceeded. Wait 10-30 seconds before retrying."
    );
    assert_eq!(stub.hits("/api/v1/popular"), 3);
    assert_eq!(stub.last_request().query.as_deref(), Some("limit=10"));
}

#[tokio::test]
async fn decode_failures_are_request_failures() {
    let stub = StubServer::builder()
        .reply("GET", "/api/v1/content/5/credits", 200, "[]")
        .start()
        .await;
    let server = server(&stub);

    let result = call(&server, "get_credits", json!({"content_id": 5})).await;

    assert_eq!(result["isError"], true);
    assert!(text(&result).starts_with("Request failed: Unexpected response from /api/v1/content/5/credits"));
}

#[tokio::test]
async fn watch_providers_default_to_us() {
    let stub = StubServer::builder()
        .reply(
            "GET",
            "/api/v1/content/42/watch-providers",
            200,
            r#"{"contentId":42,"country":"US","providers":{"flatrate":[{"providerId":8,"name":"Netflix","displayPriority":1}]},"attribution":"JustWatch"}"#,
        )
        .start()
        .await;
    let server = server(&stub);

    let result = call(&server, "get_watch_providers", json!({"content_id": 42})).await;

    assert_eq!(
        text(&result),
        "Watch providers for content #42 in US:\n\n  Stream: Netflix\n\nJustWatch"
    );
    assert_eq!(stub.last_request().query.as_deref(), Some("country=US"));
}

#[tokio::test]
async fn scan_submit_and_status() {
    let stub = StubServer::builder()
        .reply("POST", "/api/v1/scan-request", 200, r#"{"status":"pending"}"#)
        .reply(
            "GET",
            &format!("/api/v1/scan-request/{HASH}"),
            200,
            r#"{"status":"completed","source":"user","createdAt":"2026-02-01T10:00:00Z","completedAt":"2026-02-01T10:03:00Z"}"#,
        )
        .start()
        .await;
    let server = server(&stub);
    let upper = HASH.to_uppercase();

    let submitted = call(
        &server,
        "submit_scan_request",
        json!({"info_hash": upper, "email": "me@example.com"}),
    )
    .await;
    assert_eq!(
        text(&submitted),
        format!(
            "Scan request submitted for {HASH}.\nStatus: pending\nUse get_scan_status(info_hash=\"{HASH}\") to check progress."
        )
    );

    let status = call(&server, "get_scan_status", json!({"info_hash": upper})).await;
    assert_eq!(
        text(&status),
        format!(
            "Scan status for {HASH}:\n  Status: completed\n  Source: user\n  Submitted: 2026-02-01T10:00:00Z\n  Completed: 2026-02-01T10:03:00Z"
        )
    );
}

#[tokio::test]
async fn track_interaction_confirms() {
    let stub = StubServer::builder()
        .reply("POST", "/api/v1/track", 200, r#"{"ok":true}"#)
        .start()
        .await;
    let server = server(&stub);

    let result = call(&server, "track_interaction", json!({"info_hash": HASH, "action": "magnet"})).await;

    assert_eq!(text(&result), format!("Tracked magnet for {HASH}."));
}

#[tokio::test]
async fn stats_resource_is_pretty_json() {
    let stub = StubServer::builder()
        .reply("GET", "/api/v1/stats", 200, STATS_BODY)
        .start()
        .await;
    let server = server(&stub);

    let msg = json!({
        "jsonrpc": "2.0",
        "id": "r1",
        "method": "resources/read",
        "params": {"uri": "torrentclaw://stats"}
    });
    let resp = serde_json::to_value(server.handle_value(&msg).await.unwrap()).unwrap();

    let contents = &resp["result"]["contents"][0];
    assert_eq!(contents["mimeType"], "application/json");
    let text = contents["text"].as_str().unwrap();
    assert!(text.contains("\n  \"content\": {"));
    let parsed: Value = serde_json::from_str(text).unwrap();
    assert_eq!(parsed["torrents"]["bySource"]["yts"], 5000);
}

#[tokio::test]
async fn stats_resource_failure_is_rpc_error() {
    let stub = StubServer::builder()
        .reply("GET", "/api/v1/stats", 502, "")
        .start()
        .await;
    let server = server(&stub);

    let msg = json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "resources/read",
        "params": {"uri": "torrentclaw://stats"}
    });
    let resp = serde_json::to_value(server.handle_value(&msg).await.unwrap()).unwrap();

    assert_eq!(resp["error"]["code"], -32603);
    assert_eq!(
        resp["error"]["message"],
        "TorrentClaw is temporarily unavailable. Try again in a moment."
    );
}

#[tokio::test]
async fn call_tool_directly() {
    let stub = StubServer::builder()
        .reply("GET", "/api/v1/autocomplete", 200, r#"{"suggestions":[{"id":42,"title":"Dune","year":2021,"contentType":"movie"}]}"#)
        .start()
        .await;
    let client = Arc::new(stub.client());

    let result = tools::call_tool(&client, "autocomplete", json!({"query": "du"}))
        .await
        .unwrap();

    assert!(!result.is_error);
    assert!(result.joined_text().contains("Dune"));

    let short = tools::call_tool(&client, "autocomplete", json!({"query": "d"}))
        .await
        .unwrap();
    assert!(short.is_error);
    assert_eq!(stub.hits("/api/v1/autocomplete"), 1);
}
