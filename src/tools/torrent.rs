//! Torrent-level tools: download URL, interaction tracking, media scans

use serde::Deserialize;
use serde_json::{Value, json};

use super::validate;
use crate::client::{TorrentClawClient, TrackAction};
use crate::format::format_scan_status;
use crate::protocol::{Tool, ToolAnnotations};
use crate::{Error, Result};

fn info_hash_schema(description: &str) -> Value {
    json!({
        "type": "string",
        "pattern": "^[a-fA-F0-9]{40}$",
        "description": description
    })
}

pub(super) fn definitions() -> Vec<Tool> {
    vec![
        Tool {
            name: "get_torrent_url".to_string(),
            title: Some("Torrent File URL".to_string()),
            description: Some(
                "Direct .torrent download URL for an info_hash. Use when the user wants \
                 a .torrent file instead of a magnet link (search_content already \
                 returns magnets)."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "info_hash": info_hash_schema("40-character hex info_hash from search_content results")
                },
                "required": ["info_hash"]
            }),
            annotations: Some(ToolAnnotations {
                open_world_hint: Some(false),
                ..ToolAnnotations::read_only()
            }),
        },
        Tool {
            name: "track_interaction".to_string(),
            title: Some("Track Interaction".to_string()),
            description: Some(
                "Record a user interaction with a torrent (magnet click, .torrent \
                 download or hash copy) after presenting it, so popularity stats stay \
                 accurate."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "info_hash": info_hash_schema("40-character hex info_hash"),
                    "action": {
                        "type": "string",
                        "enum": ["magnet", "torrent_download", "copy"],
                        "description": "'magnet' opened a magnet link, 'torrent_download' fetched the .torrent, 'copy' copied the hash or magnet"
                    }
                },
                "required": ["info_hash", "action"]
            }),
            annotations: Some(ToolAnnotations::writes()),
        },
        Tool {
            name: "submit_scan_request".to_string(),
            title: Some("Submit Scan".to_string()),
            description: Some(
                "Queue a torrent for audio/video analysis (codecs, tracks, resolution, \
                 HDR). Results are not instant; poll with get_scan_status. Limited to 5 \
                 requests per hour."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "info_hash": info_hash_schema("40-character hex info_hash to scan"),
                    "email": {
                        "type": "string",
                        "format": "email",
                        "maxLength": 200,
                        "description": "Address notified when the scan completes"
                    }
                },
                "required": ["info_hash", "email"]
            }),
            annotations: Some(ToolAnnotations::writes()),
        },
        Tool {
            name: "get_scan_status".to_string(),
            title: Some("Scan Status".to_string()),
            description: Some(
                "Status of a scan request (pending, scanning, completed, failed). Use \
                 after submit_scan_request."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "info_hash": info_hash_schema("40-character hex info_hash to check")
                },
                "required": ["info_hash"]
            }),
            annotations: Some(ToolAnnotations::read_only()),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct HashArgs {
    info_hash: String,
}

impl HashArgs {
    fn parse(arguments: Value) -> Result<String> {
        let args: Self = validate::parse_args(arguments)?;
        validate::info_hash(&args.info_hash)
    }
}

pub(super) fn get_torrent_url(client: &TorrentClawClient, arguments: Value) -> Result<String> {
    let hash = HashArgs::parse(arguments)?;
    Ok(format!(
        "Download .torrent file: {}",
        client.torrent_download_url(&hash)
    ))
}

#[derive(Debug, Deserialize)]
struct TrackArgs {
    info_hash: String,
    action: String,
}

fn parse_action(action: &str) -> Result<TrackAction> {
    match action {
        "magnet" => Ok(TrackAction::Magnet),
        "torrent_download" => Ok(TrackAction::TorrentDownload),
        "copy" => Ok(TrackAction::Copy),
        other => Err(Error::InvalidArguments(format!(
            "action must be one of: magnet, torrent_download, copy (got '{other}')"
        ))),
    }
}

pub(super) async fn track_interaction(
    client: &TorrentClawClient,
    arguments: Value,
) -> Result<String> {
    let args: TrackArgs = validate::parse_args(arguments)?;
    let hash = validate::info_hash(&args.info_hash)?;
    let action = parse_action(&args.action)?;
    client.track(&hash, action).await?;
    Ok(format!("Tracked {action} for {hash}."))
}

#[derive(Debug, Deserialize)]
struct ScanArgs {
    info_hash: String,
    email: String,
}

pub(super) async fn submit_scan_request(
    client: &TorrentClawClient,
    arguments: Value,
) -> Result<String> {
    let args: ScanArgs = validate::parse_args(arguments)?;
    let hash = validate::info_hash(&args.info_hash)?;
    validate::email(&args.email)?;
    let data = client.submit_scan_request(&hash, &args.email).await?;
    Ok(format!(
        "Scan request submitted for {hash}.\nStatus: {}\nUse get_scan_status(info_hash=\"{hash}\") to check progress.",
        data.status
    ))
}

pub(super) async fn get_scan_status(client: &TorrentClawClient, arguments: Value) -> Result<String> {
    let hash = HashArgs::parse(arguments)?;
    let data = client.scan_status(&hash).await?;
    Ok(format_scan_status(&hash, &data))
}
