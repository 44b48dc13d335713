//! Error types for the TorrentClaw MCP server

use std::fmt;
use std::io;

use thiserror::Error;

/// Result type alias for the TorrentClaw MCP server
pub type Result<T> = std::result::Result<T, Error>;

/// TorrentClaw MCP errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (invalid or disallowed base URL, bad config file)
    #[error("{0}")]
    Config(String),

    /// Upstream API answered with a non-2xx status
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Transport failure: timeout, DNS, connection refused
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream JSON did not match the expected shape
    #[error("Unexpected response from {endpoint}: {message}")]
    Decode {
        /// Endpoint path that produced the payload
        endpoint: String,
        /// Decoder message
        message: String,
    },

    /// Tool argument validation failure
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Protocol error
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// JSON-RPC error
    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc {
        /// Error code
        code: i32,
        /// Error message
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a JSON-RPC error
    pub fn json_rpc(code: i32, message: impl Into<String>) -> Self {
        Self::JsonRpc {
            code,
            message: message.into(),
        }
    }

    /// Convert to JSON-RPC error code
    #[must_use]
    pub fn to_rpc_code(&self) -> i32 {
        match self {
            Self::JsonRpc { code, .. } => *code,
            Self::Json(_) => rpc_codes::PARSE_ERROR,
            Self::Protocol(_) => rpc_codes::INVALID_REQUEST,
            Self::InvalidArguments(_) => rpc_codes::INVALID_PARAMS,
            _ => rpc_codes::INTERNAL_ERROR,
        }
    }
}

/// Non-2xx response from the TorrentClaw API.
///
/// `body` carries at most [`ApiError::MAX_BODY_CHARS`] characters of the
/// response body, and only for 4xx statuses. Server-side error bodies are
/// withheld.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Truncated response body (4xx only)
    pub body: String,
}

impl ApiError {
    /// Maximum number of body characters kept for client errors
    pub const MAX_BODY_CHARS: usize = 200;

    /// Build an error from a status and the raw response body
    #[must_use]
    pub fn new(status: u16, raw_body: &str) -> Self {
        let body = if (400..500).contains(&status) {
            raw_body.chars().take(Self::MAX_BODY_CHARS).collect()
        } else {
            String::new()
        };
        Self { status, body }
    }

    /// Human-readable message for the status
    #[must_use]
    pub fn message(&self) -> String {
        let known = match self.status {
            400 => "Bad request — check that all parameters are valid.",
            401 => "API key required or invalid. Set TORRENTCLAW_API_KEY environment variable.",
            403 => "Insufficient API tier or endpoint not allowed for this key.",
            404 => {
                "Not found — the requested content ID does not exist. Use search_content to find valid IDs."
            }
            429 => "Rate limit exceeded. Wait 10-30 seconds before retrying.",
            500 => "TorrentClaw server error. Try again in a moment.",
            502 => "TorrentClaw is temporarily unavailable. Try again in a moment.",
            503 => "TorrentClaw is under maintenance. Try again later.",
            other => return format!("API request failed with status {other}"),
        };
        known.to_string()
    }

    /// Whether the upstream asked us to slow down
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ApiError {}

/// Standard JSON-RPC error codes
pub mod rpc_codes {
    /// Parse error - Invalid JSON
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid Request - Not a valid Request object
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error
    pub const INTERNAL_ERROR: i32 = -32603;
}
