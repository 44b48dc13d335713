//! TorrentClaw MCP server library
//!
//! Exposes the TorrentClaw movie and TV catalog to MCP clients: content
//! search with torrent options, streaming availability, credits and media
//! scans.
//!
//! # Layout
//!
//! - [`client`]: HTTP client with response caching and 429 backoff
//! - [`cache`]: LRU + TTL response cache
//! - [`security`]: base URL (SSRF) validation and input checks
//! - [`format`]: plain-text rendering and season/episode filtering
//! - [`tools`], [`resources`], [`prompts`]: the MCP surface
//! - [`server`]: JSON-RPC dispatch and the stdio transport

#![forbid(unsafe_code)]

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod prompts;
pub mod protocol;
pub mod resources;
pub mod security;
pub mod server;
pub mod tools;

pub use error::{Error, Result};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging
///
/// Logs go to stderr; stdout carries the protocol.
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    let initialized = match format {
        Some("json") => subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        _ => subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    initialized.map_err(|e| Error::Config(format!("Failed to initialize logging: {e}")))
}
