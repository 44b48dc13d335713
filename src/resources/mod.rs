//! MCP resources: live catalog statistics and the static presentation guide

use crate::client::TorrentClawClient;
use crate::error::rpc_codes;
use crate::protocol::{Resource, ResourceContents, ResourcesReadResult};
use crate::{Error, Result};

/// Catalog statistics, fetched on every read
pub const STATS_URI: &str = "torrentclaw://stats";
/// Markdown guide for presenting search results
pub const GUIDE_URI: &str = "torrentclaw://presentation-guide";

const PRESENTATION_GUIDE: &str = include_str!("presentation_guide.md");

/// Definitions for `resources/list`
#[must_use]
pub fn resource_definitions() -> Vec<Resource> {
    vec![
        Resource {
            uri: STATS_URI.to_string(),
            name: "stats".to_string(),
            description: Some(
                "TorrentClaw catalog statistics as JSON: content counts (movies, shows, \
                 TMDB-enriched), torrent counts (total, with seeders, per source) and recent \
                 ingestion runs. Shows catalog coverage and data freshness."
                    .to_string(),
            ),
            mime_type: Some("application/json".to_string()),
        },
        Resource {
            uri: GUIDE_URI.to_string(),
            name: "presentation-guide".to_string(),
            description: Some(
                "How to present torrent search results to users in an actionable format"
                    .to_string(),
            ),
            mime_type: Some("text/markdown".to_string()),
        },
    ]
}

/// Static guide text
#[must_use]
pub fn presentation_guide() -> &'static str {
    PRESENTATION_GUIDE
}

/// Read one resource by URI
///
/// # Errors
///
/// `INVALID_PARAMS` for an unknown URI; upstream failures for the stats
/// resource are passed through.
pub async fn read_resource(client: &TorrentClawClient, uri: &str) -> Result<ResourcesReadResult> {
    let contents = match uri {
        STATS_URI => {
            let stats = client.stats().await?;
            ResourceContents {
                uri: uri.to_string(),
                mime_type: Some("application/json".to_string()),
                text: serde_json::to_string_pretty(&stats)?,
            }
        }
        GUIDE_URI => ResourceContents {
            uri: uri.to_string(),
            mime_type: Some("text/markdown".to_string()),
            text: PRESENTATION_GUIDE.to_string(),
        },
        other => {
            return Err(Error::json_rpc(
                rpc_codes::INVALID_PARAMS,
                format!("Unknown resource: {other}"),
            ));
        }
    };
    Ok(ResourcesReadResult {
        contents: vec![contents],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_both_resources() {
        let uris: Vec<String> = resource_definitions().into_iter().map(|r| r.uri).collect();
        assert_eq!(uris, [STATS_URI, GUIDE_URI]);
    }

    #[test]
    fn guide_covers_magnet_links() {
        let guide = presentation_guide();
        assert!(guide.starts_with("# TorrentClaw Results Presentation Guide"));
        assert!(guide.contains("[📥 Download](magnet:"));
        assert!(guide.contains("No active seeders"));
    }
}
