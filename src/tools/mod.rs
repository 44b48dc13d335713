//! MCP tools backed by the TorrentClaw API
//!
//! Every handler returns the rendered text or an [`Error`]. Failures never
//! escape as JSON-RPC errors: [`call_tool`] folds them into a tool result
//! with `isError: true`.

mod browse;
mod details;
mod search;
mod torrent;
mod validate;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::client::TorrentClawClient;
use crate::error::rpc_codes;
use crate::protocol::{Tool, ToolsCallResult};
use crate::{Error, Result};

/// Names of all tools, in listing order
pub const TOOL_NAMES: &[&str] = &[
    "search_content",
    "autocomplete",
    "get_popular",
    "get_recent",
    "get_watch_providers",
    "get_credits",
    "get_torrent_url",
    "track_interaction",
    "submit_scan_request",
    "get_scan_status",
];

const UNKNOWN_FAILURE: &str = "Request failed: Unknown error";

/// Definitions for `tools/list`
#[must_use]
pub fn tool_definitions() -> Vec<Tool> {
    let mut tools = search::definitions();
    tools.extend(browse::definitions());
    tools.extend(details::definitions());
    tools.extend(torrent::definitions());
    tools
}

/// Text shown to the model for a failed call
#[must_use]
pub fn render_error(err: &Error) -> String {
    match err {
        Error::Api(api) => format!("TorrentClaw API error ({}): {}", api.status, api.message()),
        Error::InvalidArguments(_) => err.to_string(),
        other => format!("Request failed: {other}"),
    }
}

async fn dispatch(client: &TorrentClawClient, name: &str, arguments: Value) -> Result<String> {
    match name {
        "search_content" => search::search_content(client, arguments).await,
        "autocomplete" => search::autocomplete(client, arguments).await,
        "get_popular" => browse::get_popular(client, arguments).await,
        "get_recent" => browse::get_recent(client, arguments).await,
        "get_watch_providers" => details::get_watch_providers(client, arguments).await,
        "get_credits" => details::get_credits(client, arguments).await,
        "get_torrent_url" => torrent::get_torrent_url(client, arguments),
        "track_interaction" => torrent::track_interaction(client, arguments).await,
        "submit_scan_request" => torrent::submit_scan_request(client, arguments).await,
        "get_scan_status" => torrent::get_scan_status(client, arguments).await,
        other => Err(unknown_tool(other)),
    }
}

fn unknown_tool(name: &str) -> Error {
    Error::json_rpc(rpc_codes::INVALID_PARAMS, format!("Unknown tool: {name}"))
}

/// Run one tool call
///
/// The handler runs on its own task so a panic surfaces as a failed tool
/// result instead of tearing down the server loop.
///
/// # Errors
///
/// Only for an unknown tool name; every handler failure becomes a result
/// with `is_error` set.
pub async fn call_tool(
    client: &Arc<TorrentClawClient>,
    name: &str,
    arguments: Value,
) -> Result<ToolsCallResult> {
    if !TOOL_NAMES.contains(&name) {
        return Err(unknown_tool(name));
    }

    debug!(tool = name, "Calling tool");
    let task_client = Arc::clone(client);
    let task_name = name.to_string();
    let handle =
        tokio::spawn(async move { dispatch(&task_client, &task_name, arguments).await });

    let result = match handle.await {
        Ok(Ok(text)) => ToolsCallResult::text(text),
        Ok(Err(e)) => {
            warn!(tool = name, error = %e, "Tool call failed");
            ToolsCallResult::error(render_error(&e))
        }
        Err(e) => {
            error!(tool = name, panicked = e.is_panic(), "Tool task aborted");
            ToolsCallResult::error(UNKNOWN_FAILURE)
        }
    };
    Ok(result)
}
