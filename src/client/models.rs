//! Typed request and response models for the TorrentClaw REST API
//!
//! The upstream speaks camelCase JSON. Nullable upstream fields are
//! `Option`s; collections the upstream may omit default to empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Parameters for `/api/v1/search`
///
/// Only `query` is required; every `None` is left out of the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    /// Free-text query, usually a title
    pub query: String,
    /// `movie` or `show`
    pub content_type: Option<String>,
    /// Genre name
    pub genre: Option<String>,
    /// Earliest release year
    pub year_min: Option<i32>,
    /// Latest release year
    pub year_max: Option<i32>,
    /// IMDb rating floor
    pub min_rating: Option<f64>,
    /// Resolution filter (`1080p`, ...)
    pub quality: Option<String>,
    /// ISO 639-1 torrent language
    pub language: Option<String>,
    /// Audio codec substring
    pub audio: Option<String>,
    /// HDR format
    pub hdr: Option<String>,
    /// Seeder availability filter
    pub availability: Option<String>,
    /// Locale for translated titles and overviews
    pub locale: Option<String>,
    /// Season number
    pub season: Option<u32>,
    /// Episode number
    pub episode: Option<u32>,
    /// Sort mode
    pub sort: Option<String>,
    /// Page number
    pub page: Option<u32>,
    /// Results per page
    pub limit: Option<u32>,
    /// ISO 3166-1 country for streaming availability
    pub country: Option<String>,
}

/// Interaction kinds accepted by `/api/v1/track`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackAction {
    /// Magnet link opened
    Magnet,
    /// `.torrent` file downloaded
    TorrentDownload,
    /// Hash or magnet copied
    Copy,
}

impl TrackAction {
    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Magnet => "magnet",
            Self::TorrentDownload => "torrent_download",
            Self::Copy => "copy",
        }
    }
}

impl std::fmt::Display for TrackAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Search
// ============================================================================

/// Audio track reported by a torrent scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioTrack {
    pub lang: Option<String>,
    pub codec: Option<String>,
    pub channels: Option<String>,
    pub title: Option<String>,
    pub default: Option<bool>,
}

/// Subtitle track reported by a torrent scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleTrack {
    pub lang: Option<String>,
    pub codec: Option<String>,
    pub title: Option<String>,
    pub forced: Option<bool>,
}

/// Video stream properties reported by a torrent scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub codec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bit_depth: Option<u32>,
    pub hdr: Option<String>,
    pub frame_rate: Option<String>,
}

/// A single torrent attached to a content item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TorrentInfo {
    /// 40-char hex info hash
    pub info_hash: String,
    pub raw_title: Option<String>,
    /// Resolution, e.g. `1080p`
    pub quality: Option<String>,
    pub codec: Option<String>,
    pub source_type: Option<String>,
    /// Size in bytes, sent as a decimal string
    #[serde(default, deserialize_with = "string_or_number")]
    pub size_bytes: Option<String>,
    #[serde(default)]
    pub seeders: i64,
    #[serde(default)]
    pub leechers: i64,
    pub magnet_url: Option<String>,
    pub torrent_url: Option<String>,
    /// Indexer the torrent came from
    #[serde(default)]
    pub source: String,
    pub quality_score: Option<f64>,
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub audio_codec: Option<String>,
    pub hdr_type: Option<String>,
    pub release_group: Option<String>,
    pub is_proper: Option<bool>,
    pub is_repack: Option<bool>,
    pub is_remastered: Option<bool>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub audio_tracks: Option<Vec<AudioTrack>>,
    pub subtitle_tracks: Option<Vec<SubtitleTrack>>,
    pub video_info: Option<VideoInfo>,
    pub scan_status: Option<String>,
}

/// Streaming provider summary embedded in search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingProvider {
    pub provider_id: u64,
    pub name: String,
    pub logo: Option<String>,
    pub link: Option<String>,
}

/// Streaming availability embedded in search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamingInfo {
    pub flatrate: Vec<StreamingProvider>,
    pub rent: Vec<StreamingProvider>,
    pub buy: Vec<StreamingProvider>,
    pub free: Vec<StreamingProvider>,
}

/// A movie or show returned by search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: u64,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<String>,
    /// `movie` or `show`
    pub content_type: String,
    pub title: String,
    pub title_original: Option<String>,
    pub year: Option<i32>,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub rating_imdb: Option<String>,
    pub rating_tmdb: Option<String>,
    pub content_url: Option<String>,
    #[serde(default)]
    pub has_torrents: bool,
    #[serde(default)]
    pub torrents: Vec<TorrentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming: Option<StreamingInfo>,
}

/// `/api/v1/search` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    /// Season the upstream extracted from the query text (`s01e05`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_episode: Option<u32>,
    pub results: Vec<SearchResult>,
}

// ============================================================================
// Browse
// ============================================================================

/// Type-ahead suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteItem {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub content_type: String,
    pub poster_url: Option<String>,
}

/// `/api/v1/autocomplete` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub suggestions: Vec<AutocompleteItem>,
}

/// Entry in the popularity ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularItem {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub content_type: String,
    pub poster_url: Option<String>,
    pub rating_imdb: Option<String>,
    pub rating_tmdb: Option<String>,
    #[serde(default)]
    pub click_count: u64,
}

/// `/api/v1/popular` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularResponse {
    pub items: Vec<PopularItem>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Recently added content entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentItem {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub content_type: String,
    pub poster_url: Option<String>,
    pub rating_imdb: Option<String>,
    pub rating_tmdb: Option<String>,
    /// RFC 3339 timestamp
    pub created_at: String,
}

/// `/api/v1/recent` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentResponse {
    pub items: Vec<RecentItem>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

// ============================================================================
// Details
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: String,
    pub profile_url: Option<String>,
}

/// `/api/v1/content/{id}/credits` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditsResponse {
    pub content_id: u64,
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchProviderItem {
    pub provider_id: u64,
    pub name: String,
    pub logo: Option<String>,
    pub link: Option<String>,
    /// Lower sorts first
    #[serde(default)]
    pub display_priority: i64,
}

/// Providers grouped by offer type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatchProviders {
    pub flatrate: Vec<WatchProviderItem>,
    pub rent: Vec<WatchProviderItem>,
    pub buy: Vec<WatchProviderItem>,
    pub free: Vec<WatchProviderItem>,
}

/// Other countries where the title streams
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpnSuggestion {
    #[serde(default)]
    pub available_in: Vec<String>,
    #[serde(default)]
    pub affiliate_url: String,
}

/// `/api/v1/content/{id}/watch-providers` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchProvidersResponse {
    pub content_id: u64,
    pub country: String,
    #[serde(default)]
    pub providers: WatchProviders,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpn_suggestion: Option<VpnSuggestion>,
    #[serde(default)]
    pub attribution: String,
}

// ============================================================================
// Stats, tracking, scans
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub movies: u64,
    pub shows: u64,
    pub tmdb_enriched: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TorrentStats {
    pub total: u64,
    pub with_seeders: u64,
    #[serde(default)]
    pub by_source: BTreeMap<String, u64>,
}

/// One ingestion job run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionRun {
    pub source: String,
    pub status: String,
    pub started_at: String,
    pub completed_at: Option<String>,
    #[serde(default)]
    pub fetched: u64,
    #[serde(default)]
    pub new: u64,
    #[serde(default)]
    pub updated: u64,
}

/// `/api/v1/stats` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub content: ContentStats,
    pub torrents: TorrentStats,
    #[serde(default)]
    pub recent_ingestions: Vec<IngestionRun>,
}

/// `/api/v1/track` response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackResponse {
    #[serde(default)]
    pub ok: bool,
}

/// Scan request state, returned on submit and on status lookups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequestResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Accept `"1234"`, `1234` or `null` for byte counts
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn torrent_decodes_camel_case_and_nulls() {
        let torrent: TorrentInfo = serde_json::from_value(json!({
            "infoHash": "ABCDEF0123456789ABCDEF0123456789ABCDEF01",
            "rawTitle": null,
            "quality": "1080p",
            "sizeBytes": "1073741824",
            "seeders": 42,
            "leechers": 3,
            "source": "yts",
            "qualityScore": 87,
            "season": 2,
            "episode": null,
            "audioTracks": [{"lang": "en", "codec": "aac"}]
        }))
        .unwrap();

        assert_eq!(torrent.quality.as_deref(), Some("1080p"));
        assert_eq!(torrent.size_bytes.as_deref(), Some("1073741824"));
        assert_eq!(torrent.quality_score, Some(87.0));
        assert_eq!(torrent.season, Some(2));
        assert_eq!(torrent.episode, None);
        assert!(torrent.languages.is_empty());
        assert_eq!(torrent.audio_tracks.unwrap()[0].codec.as_deref(), Some("aac"));
    }

    #[test]
    fn numeric_size_is_accepted() {
        let torrent: TorrentInfo =
            serde_json::from_value(json!({"infoHash": "a", "sizeBytes": 524288000})).unwrap();
        assert_eq!(torrent.size_bytes.as_deref(), Some("524288000"));
    }

    #[test]
    fn search_response_requires_results() {
        let err = serde_json::from_value::<SearchResponse>(json!({
            "total": 1, "page": 1, "pageSize": 20
        }))
        .unwrap_err();
        assert!(err.to_string().contains("results"));
    }

    #[test]
    fn track_action_wire_names() {
        assert_eq!(
            serde_json::to_value(TrackAction::TorrentDownload).unwrap(),
            json!("torrent_download")
        );
        let parsed: TrackAction = serde_json::from_value(json!("copy")).unwrap();
        assert_eq!(parsed, TrackAction::Copy);
        assert!(serde_json::from_value::<TrackAction>(json!("share")).is_err());
    }
}
