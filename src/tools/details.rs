//! `get_watch_providers` and `get_credits`

use serde::Deserialize;
use serde_json::{Value, json};

use super::validate;
use crate::Result;
use crate::client::TorrentClawClient;
use crate::format::{format_credits, format_watch_providers};
use crate::protocol::{Tool, ToolAnnotations};

const DEFAULT_COUNTRY: &str = "US";
const MAX_CONTENT_ID: u64 = 999_999_999;

fn content_id_schema() -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "maximum": MAX_CONTENT_ID,
        "description": "content_id from search_content results"
    })
}

pub(super) fn definitions() -> Vec<Tool> {
    vec![
        Tool {
            name: "get_watch_providers".to_string(),
            title: Some("Watch Providers".to_string()),
            description: Some(
                "Where a movie or show can be streamed, rented or bought (Netflix, \
                 Disney+, Prime Video...) in one country. Needs a content_id from \
                 search_content. If search_content already got a country, its results \
                 include this; use the tool for another country or more detail. Groups: \
                 Stream, Free, Rent, Buy."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "content_id": content_id_schema(),
                    "country": {
                        "type": "string",
                        "pattern": "^[A-Z]{2}$",
                        "default": DEFAULT_COUNTRY,
                        "description": "ISO 3166-1 country code (e.g. US, ES, GB)"
                    }
                },
                "required": ["content_id"]
            }),
            annotations: Some(ToolAnnotations::read_only()),
        },
        Tool {
            name: "get_credits".to_string(),
            title: Some("Credits".to_string()),
            description: Some(
                "Director and top cast (with character names) of a movie or show. Use \
                 for questions about actors, cast, director or 'who is in' a title. Needs \
                 a content_id from search_content."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "content_id": content_id_schema()
                },
                "required": ["content_id"]
            }),
            annotations: Some(ToolAnnotations::read_only()),
        },
    ]
}

fn check_content_id(id: u64) -> Result<()> {
    validate::range("content_id", id, 1, MAX_CONTENT_ID)
}

#[derive(Debug, Deserialize)]
struct WatchProvidersArgs {
    content_id: u64,
    country: Option<String>,
}

pub(super) async fn get_watch_providers(
    client: &TorrentClawClient,
    arguments: Value,
) -> Result<String> {
    let args: WatchProvidersArgs = validate::parse_args(arguments)?;
    check_content_id(args.content_id)?;
    let country = args.country.as_deref().unwrap_or(DEFAULT_COUNTRY);
    validate::country(country)?;
    let data = client.watch_providers(args.content_id, country).await?;
    Ok(format_watch_providers(&data))
}

#[derive(Debug, Deserialize)]
struct CreditsArgs {
    content_id: u64,
}

pub(super) async fn get_credits(client: &TorrentClawClient, arguments: Value) -> Result<String> {
    let args: CreditsArgs = validate::parse_args(arguments)?;
    check_content_id(args.content_id)?;
    let data = client.credits(args.content_id).await?;
    Ok(format_credits(&data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_id_bounds() {
        assert!(check_content_id(1).is_ok());
        assert!(check_content_id(999_999_999).is_ok());
        assert!(check_content_id(0).is_err());
        assert!(check_content_id(1_000_000_000).is_err());
    }

    #[test]
    fn content_id_must_be_integer() {
        assert!(validate::parse_args::<CreditsArgs>(json!({"content_id": "42"})).is_err());
        assert!(validate::parse_args::<CreditsArgs>(json!({"content_id": -3})).is_err());
        assert!(validate::parse_args::<CreditsArgs>(json!({})).is_err());
    }

    #[test]
    fn country_optional() {
        let args: WatchProvidersArgs =
            validate::parse_args(json!({"content_id": 42})).unwrap();
        assert!(args.country.is_none());
    }
}
