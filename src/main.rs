//! TorrentClaw MCP server
//!
//! Serves the TorrentClaw catalog to MCP clients over stdio.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde_json::Value;
use tracing::{error, info};

use torrentclaw_mcp::{
    cli::{Cli, Command},
    client::TorrentClawClient,
    config::Config,
    server::{McpServer, stdio},
    setup_tracing, tools,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(code) => return code,
    };

    match cli.command {
        Some(Command::Check) => run_check(&config),
        Some(Command::Call { ref tool, ref args }) => run_call(&config, tool, args).await,
        Some(Command::Serve) | None => run_server(&config).await,
    }
}

/// Load the config file and environment, then apply CLI overrides
fn load_config(cli: &Cli) -> Result<Config, ExitCode> {
    match Config::load(cli.config.as_deref()) {
        Ok(mut config) => {
            cli.apply_overrides(&mut config);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {e}");
            Err(ExitCode::FAILURE)
        }
    }
}

fn build_client(config: &Config) -> Option<Arc<TorrentClawClient>> {
    match TorrentClawClient::new(config) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            error!("Invalid configuration: {e}");
            None
        }
    }
}

/// Validate configuration without starting the server
fn run_check(config: &Config) -> ExitCode {
    match config.validate() {
        Ok(base_url) => {
            println!("Configuration OK");
            println!("  API URL: {base_url}");
            println!(
                "  API key: {}",
                if config.api_key.is_some() { "set" } else { "not set" }
            );
            println!(
                "  Cache: {} entries, TTL {}s",
                config.cache.max_entries,
                config.cache.ttl.as_secs()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run one tool and print its text
async fn run_call(config: &Config, tool: &str, raw_args: &str) -> ExitCode {
    let Some(client) = build_client(config) else {
        return ExitCode::FAILURE;
    };

    let arguments: Value = match serde_json::from_str(raw_args) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid JSON arguments: {e}");
            return ExitCode::FAILURE;
        }
    };

    match tools::call_tool(&client, tool, arguments).await {
        Ok(result) => {
            println!("{}", result.joined_text());
            if result.is_error {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Run the stdio MCP server
async fn run_server(config: &Config) -> ExitCode {
    let Some(client) = build_client(config) else {
        return ExitCode::FAILURE;
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        api_url = client.base_url(),
        cache_entries = config.cache.max_entries,
        "Starting TorrentClaw MCP server"
    );

    let server = McpServer::new(client);
    if let Err(e) = stdio::serve(&server).await {
        error!("Server error: {e}");
        return ExitCode::FAILURE;
    }

    info!("Server shutdown complete");
    ExitCode::SUCCESS
}
