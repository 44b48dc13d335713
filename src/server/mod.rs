//! MCP request dispatch
//!
//! [`McpServer`] turns one decoded JSON-RPC message into at most one
//! response. Transport concerns live in [`stdio`].

pub mod stdio;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::client::TorrentClawClient;
use crate::error::rpc_codes;
use crate::protocol::{
    Info, InitializeResult, JsonRpcResponse, PromptsCapability, PromptsGetParams,
    PromptsListResult, RequestId, ResourcesCapability, ResourcesListResult, ResourcesReadParams,
    ServerCapabilities, ToolsCallParams, ToolsCapability, ToolsListResult, negotiate_version,
};
use crate::{Error, Result, prompts, resources, tools};

/// Server name reported in `initialize`
pub const SERVER_NAME: &str = "torrentclaw";

const INSTRUCTIONS: &str = "Search and discover movies and TV shows with torrent downloads, \
streaming availability, and cast/crew metadata. Start with search_content to find content, \
then use get_watch_providers or get_credits with the content_id. Use get_popular/get_recent to \
browse (no torrents — search for a title to get torrents).";

/// Stateless MCP handler over a shared API client
#[derive(Clone)]
pub struct McpServer {
    client: Arc<TorrentClawClient>,
}

impl McpServer {
    /// Create a handler
    #[must_use]
    pub fn new(client: Arc<TorrentClawClient>) -> Self {
        Self { client }
    }

    /// Shared API client
    #[must_use]
    pub fn client(&self) -> &Arc<TorrentClawClient> {
        &self.client
    }

    /// Handle one raw line of input
    ///
    /// Returns `None` for notifications and stray responses.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<Value>(line) {
            Ok(value) => self.handle_value(&value).await,
            Err(e) => Some(JsonRpcResponse::error(
                None,
                rpc_codes::PARSE_ERROR,
                format!("Invalid JSON: {e}"),
            )),
        }
    }

    /// Handle one decoded message
    pub async fn handle_value(&self, value: &Value) -> Option<JsonRpcResponse> {
        let (id, method, params) = match parse_message(value) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return None,
            Err(response) => return Some(response),
        };

        let Some(id) = id else {
            debug!(notification = %method, "Notification received");
            return None;
        };

        debug!(method = %method, id = %id, "Request received");
        Some(self.handle_request(id, &method, params).await)
    }

    async fn handle_request(&self, id: RequestId, method: &str, params: Option<Value>) -> JsonRpcResponse {
        let result = match method {
            "initialize" => Ok(Self::initialize(params.as_ref())),
            "ping" => Ok(json!({})),
            "tools/list" => to_value(ToolsListResult {
                tools: tools::tool_definitions(),
            }),
            "tools/call" => self.call_tool(params).await,
            "resources/list" => to_value(ResourcesListResult {
                resources: resources::resource_definitions(),
            }),
            "resources/read" => self.read_resource(params).await,
            "prompts/list" => to_value(PromptsListResult {
                prompts: prompts::prompt_definitions(),
            }),
            "prompts/get" => parse_params::<PromptsGetParams>(params)
                .and_then(|p| prompts::get_prompt(&p.name, &p.arguments))
                .and_then(to_value),
            other => Err(Error::json_rpc(
                rpc_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        };

        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => {
                warn!(method, error = %e, "Request failed");
                JsonRpcResponse::error(Some(id), e.to_rpc_code(), error_message(&e))
            }
        }
    }

    fn initialize(params: Option<&Value>) -> Value {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let negotiated = negotiate_version(requested);
        debug!(client = requested, negotiated, "Protocol version negotiation");

        let result = InitializeResult {
            protocol_version: negotiated.to_string(),
            capabilities: ServerCapabilities {
                prompts: Some(PromptsCapability::default()),
                resources: Some(ResourcesCapability::default()),
                tools: Some(ToolsCapability::default()),
            },
            server_info: Info {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("TorrentClaw".to_string()),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        };
        serde_json::to_value(result).unwrap_or_else(|_| json!({}))
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value> {
        let params: ToolsCallParams = parse_params(params)?;
        let result = tools::call_tool(&self.client, &params.name, params.arguments).await?;
        to_value(result)
    }

    async fn read_resource(&self, params: Option<Value>) -> Result<Value> {
        let params: ResourcesReadParams = parse_params(params)?;
        let result = resources::read_resource(&self.client, &params.uri).await?;
        to_value(result)
    }
}

/// JSON-RPC `message` for a failed request
fn error_message(err: &Error) -> String {
    match err {
        Error::JsonRpc { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T> {
    let params = params.unwrap_or_else(|| json!({}));
    serde_json::from_value(params)
        .map_err(|e| Error::json_rpc(rpc_codes::INVALID_PARAMS, format!("Invalid params: {e}")))
}

fn extract_request_id(value: &Value) -> Option<RequestId> {
    match value {
        Value::String(s) => Some(RequestId::String(s.clone())),
        Value::Number(n) => n.as_i64().map(RequestId::Number),
        _ => None,
    }
}

type ParsedMessage = (Option<RequestId>, String, Option<Value>);

/// Split a message into id, method and params
///
/// `Ok(None)` means a response from the client, which needs no answer.
#[allow(clippy::result_large_err)]
fn parse_message(value: &Value) -> std::result::Result<Option<ParsedMessage>, JsonRpcResponse> {
    let id = value.get("id").and_then(extract_request_id);

    if !value.is_object() {
        return Err(JsonRpcResponse::error(
            None,
            rpc_codes::INVALID_REQUEST,
            "Invalid Request: expected a JSON object",
        ));
    }

    if value.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return Err(JsonRpcResponse::error(
            id,
            rpc_codes::INVALID_REQUEST,
            "Invalid JSON-RPC version",
        ));
    }

    let Some(method) = value.get("method").and_then(Value::as_str) else {
        if value.get("result").is_some() || value.get("error").is_some() {
            return Ok(None);
        }
        return Err(JsonRpcResponse::error(
            id,
            rpc_codes::INVALID_REQUEST,
            "Missing method",
        ));
    };

    // A present id must be usable; null or fractional ids are not notifications
    if id.is_none() && value.get("id").is_some() {
        return Err(JsonRpcResponse::error(
            None,
            rpc_codes::INVALID_REQUEST,
            "Invalid Request: id must be a string or an integer",
        ));
    }

    Ok(Some((id, method.to_string(), value.get("params").cloned())))
}
