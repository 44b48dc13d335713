//! Newline-delimited JSON-RPC over stdin/stdout

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{debug, error, info};

use super::McpServer;
use crate::Result;
use crate::protocol::JsonRpcResponse;

/// Serve on the process's stdin/stdout until EOF or a shutdown signal
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub async fn serve(server: &McpServer) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    info!(base_url = %server.client().base_url(), "TorrentClaw MCP server listening on stdio");
    run(server, stdin, stdout, shutdown_signal()).await
}

/// Drive `server` over any line reader and writer
///
/// Messages are handled one at a time in arrival order.
///
/// # Errors
///
/// Returns an error if reading input or writing a response fails.
pub async fn run<R, W, S>(server: &McpServer, reader: R, mut writer: W, shutdown: S) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = reader.lines();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            biased;
            () = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
            next = lines.next_line() => next?,
        };

        let Some(line) = line else {
            debug!("stdin closed");
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(response) = server.handle_line(line).await {
            write_response(&mut writer, &response).await?;
        }
    }

    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &JsonRpcResponse) -> Result<()> {
    let mut payload = serde_json::to_vec(response)?;
    payload.push(b'\n');
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::Value;

    use crate::client::TorrentClawClient;
    use crate::config::Config;

    fn server() -> McpServer {
        McpServer::new(Arc::new(TorrentClawClient::new(&Config::default()).unwrap()))
    }

    async fn drive(input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        run(
            &server(),
            input.as_bytes(),
            &mut output,
            std::future::pending::<()>(),
        )
        .await
        .unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn one_response_per_request_in_order() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-06-18"}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":"two","method":"ping"}"#,
            "\n",
        );
        let responses = drive(input).await;
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], "two");
    }

    #[tokio::test]
    async fn garbage_line_does_not_stop_the_loop() {
        let input = "not json\n{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"ping\"}\n";
        let responses = drive(input).await;
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert_eq!(responses[1]["id"], 3);
    }

    #[tokio::test]
    async fn shutdown_stops_before_reading() {
        let mut output = Vec::new();
        run(
            &server(),
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n".as_bytes(),
            &mut output,
            std::future::ready(()),
        )
        .await
        .unwrap();
        assert!(output.is_empty());
    }
}
