//! `search_content` and `autocomplete`

use serde::Deserialize;
use serde_json::{Value, json};

use super::validate;
use crate::Result;
use crate::client::{SearchParams, TorrentClawClient};
use crate::format::{FormatOptions, format_autocomplete, format_search_results};
use crate::protocol::{Tool, ToolAnnotations};

const DEFAULT_LIMIT: u32 = 20;
const DEFAULT_SORT: &str = "relevance";

const CONTENT_TYPES: &[&str] = &["movie", "show"];
const QUALITIES: &[&str] = &["480p", "720p", "1080p", "2160p"];
const HDR_FORMATS: &[&str] = &["hdr10", "dolby_vision", "hdr10plus", "hlg"];
const AVAILABILITY: &[&str] = &["all", "available", "unavailable"];
const SORT_ORDERS: &[&str] = &["relevance", "seeders", "year", "rating", "added"];

pub(super) fn definitions() -> Vec<Tool> {
    vec![
        Tool {
            name: "search_content".to_string(),
            title: Some("Search Content".to_string()),
            description: Some(
                "Search movies and TV shows by title, genre, year, rating or quality. \
                 Returns matching titles with metadata (year, genres, IMDb/TMDB ratings) \
                 and torrent options (magnet link, quality, seeders, size). Start here \
                 whenever a user wants to find, download or learn about a title; results \
                 carry the content_id used by get_watch_providers and get_credits. TV \
                 torrents can be narrowed with season/episode, which are also detected \
                 from queries like 'Bluey s01e05'. When presenting results, render magnet \
                 links as markdown [Download](magnet:?xt=...) and include the content URL."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "minLength": 1,
                        "maxLength": 200,
                        "description": "Movie or TV show title, partial matches allowed (e.g. 'The Matrix', 'Bluey s01e05')"
                    },
                    "type": {
                        "type": "string",
                        "enum": CONTENT_TYPES,
                        "description": "Restrict to movies or shows"
                    },
                    "genre": {
                        "type": "string",
                        "maxLength": 50,
                        "pattern": "^[a-zA-Z\\s&-]+$",
                        "description": "Genre name such as Action, Comedy, Documentary, Science Fiction"
                    },
                    "year_min": {"type": "integer", "description": "Earliest release year"},
                    "year_max": {"type": "integer", "description": "Latest release year"},
                    "min_rating": {
                        "type": "number",
                        "minimum": 0,
                        "maximum": 10,
                        "description": "Minimum IMDb rating (0-10)"
                    },
                    "quality": {
                        "type": "string",
                        "enum": QUALITIES,
                        "description": "Torrent resolution"
                    },
                    "language": {
                        "type": "string",
                        "pattern": "^[a-z]{2}$",
                        "description": "ISO 639-1 torrent language (e.g. 'en', 'es')"
                    },
                    "audio": {
                        "type": "string",
                        "pattern": "^[a-zA-Z0-9.]+$",
                        "description": "Audio codec substring (e.g. 'aac', 'flac', 'atmos', 'dts')"
                    },
                    "hdr": {
                        "type": "string",
                        "enum": HDR_FORMATS,
                        "description": "HDR format"
                    },
                    "availability": {
                        "type": "string",
                        "enum": AVAILABILITY,
                        "description": "'available' has seeders, 'unavailable' has none, 'all' is the default"
                    },
                    "season": {
                        "type": "integer",
                        "minimum": 0,
                        "maximum": 99,
                        "description": "Only show torrents for this season"
                    },
                    "episode": {
                        "type": "integer",
                        "minimum": 0,
                        "maximum": 999,
                        "description": "With season, only show torrents for this episode"
                    },
                    "locale": {
                        "type": "string",
                        "pattern": "^[a-z]{2}$",
                        "description": "Language for translated titles and overviews; English when omitted"
                    },
                    "sort": {
                        "type": "string",
                        "enum": SORT_ORDERS,
                        "default": DEFAULT_SORT,
                        "description": "Result ordering"
                    },
                    "page": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 1000,
                        "description": "Page number (default 1)"
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 50,
                        "default": DEFAULT_LIMIT,
                        "description": "Results per page"
                    },
                    "country": {
                        "type": "string",
                        "pattern": "^[A-Z]{2}$",
                        "description": "ISO 3166-1 country for streaming availability (e.g. US, ES); omitted means no streaming data"
                    },
                    "compact": {
                        "type": "boolean",
                        "default": false,
                        "description": "Shorter magnet links (hash only, no trackers) for large result sets"
                    }
                },
                "required": ["query"]
            }),
            annotations: Some(ToolAnnotations::read_only()),
        },
        Tool {
            name: "autocomplete".to_string(),
            title: Some("Autocomplete".to_string()),
            description: Some(
                "Type-ahead title suggestions. Use to check or disambiguate a title before \
                 search_content. Returns up to 8 suggestions with id, title, year and type."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "minLength": 2,
                        "maxLength": 200,
                        "description": "Partial title (at least 2 characters)"
                    }
                },
                "required": ["query"]
            }),
            annotations: Some(ToolAnnotations::read_only()),
        },
    ]
}

fn default_sort() -> String {
    DEFAULT_SORT.to_string()
}

#[derive(Debug, Deserialize)]
struct SearchContentArgs {
    query: String,
    #[serde(rename = "type")]
    content_type: Option<String>,
    genre: Option<String>,
    year_min: Option<i32>,
    year_max: Option<i32>,
    min_rating: Option<f64>,
    quality: Option<String>,
    language: Option<String>,
    audio: Option<String>,
    hdr: Option<String>,
    availability: Option<String>,
    season: Option<u32>,
    episode: Option<u32>,
    locale: Option<String>,
    #[serde(default = "default_sort")]
    sort: String,
    page: Option<u32>,
    limit: Option<u32>,
    country: Option<String>,
    #[serde(default)]
    compact: bool,
}

impl SearchContentArgs {
    fn validate(&self) -> Result<()> {
        validate::text("query", &self.query, 1, 200)?;
        if let Some(t) = &self.content_type {
            validate::one_of("type", t, CONTENT_TYPES)?;
        }
        if let Some(g) = &self.genre {
            validate::genre(g)?;
        }
        if let Some(r) = self.min_rating {
            validate::range("min_rating", r, 0.0, 10.0)?;
        }
        if let Some(q) = &self.quality {
            validate::one_of("quality", q, QUALITIES)?;
        }
        if let Some(l) = &self.language {
            validate::language("language", l)?;
        }
        if let Some(a) = &self.audio {
            validate::audio(a)?;
        }
        if let Some(h) = &self.hdr {
            validate::one_of("hdr", h, HDR_FORMATS)?;
        }
        if let Some(a) = &self.availability {
            validate::one_of("availability", a, AVAILABILITY)?;
        }
        if let Some(s) = self.season {
            validate::range("season", s, 0, 99)?;
        }
        if let Some(e) = self.episode {
            validate::range("episode", e, 0, 999)?;
        }
        if let Some(l) = &self.locale {
            validate::language("locale", l)?;
        }
        validate::one_of("sort", &self.sort, SORT_ORDERS)?;
        if let Some(p) = self.page {
            validate::range("page", p, 1, 1000)?;
        }
        if let Some(l) = self.limit {
            validate::range("limit", l, 1, 50)?;
        }
        if let Some(c) = &self.country {
            validate::country(c)?;
        }
        Ok(())
    }

    fn into_request(self) -> (SearchParams, FormatOptions) {
        let options = FormatOptions {
            compact: self.compact,
            season: self.season,
            episode: self.episode,
        };
        let params = SearchParams {
            query: self.query,
            content_type: self.content_type,
            genre: self.genre,
            year_min: self.year_min,
            year_max: self.year_max,
            min_rating: self.min_rating,
            quality: self.quality,
            language: self.language,
            audio: self.audio,
            hdr: self.hdr,
            availability: self.availability,
            locale: self.locale,
            season: self.season,
            episode: self.episode,
            sort: Some(self.sort),
            page: self.page,
            limit: Some(self.limit.unwrap_or(DEFAULT_LIMIT)),
            country: self.country,
        };
        (params, options)
    }
}

pub(super) async fn search_content(client: &TorrentClawClient, arguments: Value) -> Result<String> {
    let args: SearchContentArgs = validate::parse_args(arguments)?;
    args.validate()?;
    let (params, options) = args.into_request();
    let data = client.search(&params).await?;
    Ok(format_search_results(&data, &options))
}

#[derive(Debug, Deserialize)]
struct AutocompleteArgs {
    query: String,
}

pub(super) async fn autocomplete(client: &TorrentClawClient, arguments: Value) -> Result<String> {
    let args: AutocompleteArgs = validate::parse_args(arguments)?;
    validate::text("query", &args.query, 2, 200)?;
    let data = client.autocomplete(&args.query).await?;
    Ok(format_autocomplete(&args.query, &data))
}
