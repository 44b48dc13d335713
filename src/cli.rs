//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

/// TorrentClaw MCP server - movie and TV torrent search over stdio
#[derive(Parser, Debug)]
#[command(name = "torrentclaw-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "TORRENTCLAW_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the TorrentClaw API
    #[arg(long, env = "TORRENTCLAW_API_URL", global = true)]
    pub api_url: Option<String>,

    /// API key sent as a Bearer token
    #[arg(long, env = "TORRENTCLAW_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Allow loopback and private-network API hosts (only `true` opts in)
    #[arg(
        long,
        env = "TORRENTCLAW_ALLOW_PRIVATE",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        global = true
    )]
    pub allow_private: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        default_value = "info",
        env = "TORRENTCLAW_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(
        long,
        env = "TORRENTCLAW_LOG_FORMAT",
        value_parser = ["text", "json"],
        global = true
    )]
    pub log_format: Option<String>,

    /// Subcommand (optional - defaults to server mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Layer command-line flags over a loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = self.api_url.as_deref().filter(|u| !u.trim().is_empty()) {
            config.api_url = url.to_string();
        }
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            config.api_key = Some(key.to_string());
        }
        if self.allow_private.as_deref() == Some("true") {
            config.allow_private = true;
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the MCP server on stdin/stdout (default)
    Serve,

    /// Run a single tool and print its output
    Call {
        /// Tool name (e.g. `search_content`)
        #[arg(required = true)]
        tool: String,

        /// JSON arguments for the tool
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Validate configuration and print the effective API base URL
    Check,
}
