//! `get_popular` and `get_recent`

use serde::Deserialize;
use serde_json::{Value, json};

use super::validate;
use crate::Result;
use crate::client::TorrentClawClient;
use crate::format::{format_popular_results, format_recent_results};
use crate::protocol::{Tool, ToolAnnotations};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 24;

fn browse_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "limit": {
                "type": "integer",
                "minimum": 1,
                "maximum": MAX_LIMIT,
                "default": DEFAULT_LIMIT,
                "description": "Number of items"
            },
            "page": {
                "type": "integer",
                "minimum": 1,
                "description": "Page number (default 1)"
            },
            "locale": {
                "type": "string",
                "pattern": "^[a-z]{2}$",
                "description": "Language for translated titles; English when omitted"
            }
        },
        "required": []
    })
}

pub(super) fn definitions() -> Vec<Tool> {
    vec![
        Tool {
            name: "get_popular".to_string(),
            title: Some("Popular Content".to_string()),
            description: Some(
                "Trending movies and TV shows ranked by user clicks. Use for \
                 recommendations or 'what's popular'. Returns title, year, type, ratings \
                 and content_id. Results carry no torrents; call search_content with a \
                 title to get them."
                    .to_string(),
            ),
            input_schema: browse_schema(),
            annotations: Some(ToolAnnotations::read_only()),
        },
        Tool {
            name: "get_recent".to_string(),
            title: Some("Recently Added".to_string()),
            description: Some(
                "Most recently added movies and TV shows, newest first. Use for 'what's \
                 new' or 'latest additions'. Returns title, year, type, ratings, date added \
                 and content_id. Results carry no torrents; call search_content with a \
                 title to get them."
                    .to_string(),
            ),
            input_schema: browse_schema(),
            annotations: Some(ToolAnnotations::read_only()),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct BrowseArgs {
    limit: Option<u32>,
    page: Option<u32>,
    locale: Option<String>,
}

impl BrowseArgs {
    fn parse(arguments: Value) -> Result<Self> {
        let args: Self = validate::parse_args(arguments)?;
        if let Some(limit) = args.limit {
            validate::range("limit", limit, 1, MAX_LIMIT)?;
        }
        if let Some(page) = args.page {
            validate::range("page", page, 1, u32::MAX)?;
        }
        if let Some(locale) = &args.locale {
            validate::language("locale", locale)?;
        }
        Ok(args)
    }

    fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

pub(super) async fn get_popular(client: &TorrentClawClient, arguments: Value) -> Result<String> {
    let args = BrowseArgs::parse(arguments)?;
    let data = client
        .popular(Some(args.limit()), args.page, args.locale.as_deref())
        .await?;
    Ok(format_popular_results(&data))
}

pub(super) async fn get_recent(client: &TorrentClawClient, arguments: Value) -> Result<String> {
    let args = BrowseArgs::parse(arguments)?;
    let data = client
        .recent(Some(args.limit()), args.page, args.locale.as_deref())
        .await?;
    Ok(format_recent_results(&data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_to_ten() {
        let args = BrowseArgs::parse(json!({})).unwrap();
        assert_eq!(args.limit(), 10);
        assert!(args.page.is_none());
    }

    #[test]
    fn limit_bounds() {
        assert!(BrowseArgs::parse(json!({"limit": 24})).is_ok());
        assert!(BrowseArgs::parse(json!({"limit": 25})).is_err());
        assert!(BrowseArgs::parse(json!({"limit": 0})).is_err());
        assert!(BrowseArgs::parse(json!({"page": 0})).is_err());
        assert!(BrowseArgs::parse(json!({"locale": "ES"})).is_err());
    }
}
