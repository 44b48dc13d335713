//! Search results and browse lists

use chrono::{DateTime, Utc};

use super::{episode_tag, format_rating, format_size, truncate, year_suffix};
use crate::client::{
    AutocompleteResponse, PopularResponse, RecentResponse, SearchResponse, SearchResult,
    StreamingInfo, TorrentInfo,
};

/// Torrents listed per content item
pub const MAX_TORRENTS_SHOWN: usize = 5;

/// Overview characters kept per content item
const OVERVIEW_MAX_CHARS: usize = 200;

const NO_RESULTS: &str = "No results found. Try: (1) a shorter or alternate title, \
(2) removing filters like quality or year, (3) checking spelling. \
You can also try get_popular or get_recent to browse available content.";

const BROWSE_HINT: &str = "(Use search_content with a title to get torrents and full details)";

/// Rendering options for search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Synthesize tracker-less magnets from the info hash
    pub compact: bool,
    /// Only list torrents tagged with this season
    pub season: Option<u32>,
    /// With `season`, only list torrents tagged with this episode
    pub episode: Option<u32>,
}

impl FormatOptions {
    /// Episode filter, only meaningful alongside a season filter
    fn episode_filter(&self) -> Option<u32> {
        self.season.and(self.episode)
    }

    fn matches(&self, torrent: &TorrentInfo) -> bool {
        let Some(season) = self.season else {
            return true;
        };
        if torrent.season != Some(season) {
            return false;
        }
        match self.episode_filter() {
            Some(episode) => torrent.episode == Some(episode),
            None => true,
        }
    }
}

/// Torrents passing the season/episode filter, best score first, capped
///
/// Returns the selection and the number of torrents that matched before
/// the cap.
fn select_torrents<'a>(
    torrents: &'a [TorrentInfo],
    opts: &FormatOptions,
) -> (Vec<&'a TorrentInfo>, usize) {
    let mut matching: Vec<&TorrentInfo> = torrents.iter().filter(|t| opts.matches(t)).collect();
    let count = matching.len();
    // stable: equal scores keep upstream order
    matching.sort_by(|a, b| {
        b.quality_score
            .unwrap_or(0.0)
            .total_cmp(&a.quality_score.unwrap_or(0.0))
    });
    matching.truncate(MAX_TORRENTS_SHOWN);
    (matching, count)
}

fn quality_label(t: &TorrentInfo) -> String {
    let parts: Vec<&str> = [&t.quality, &t.source_type, &t.codec, &t.hdr_type]
        .into_iter()
        .filter_map(|p| p.as_deref().filter(|s| !s.is_empty()))
        .collect();
    if parts.is_empty() {
        "Unknown quality".to_string()
    } else {
        parts.join(" ")
    }
}

/// Deduplicate preserving first-seen order
fn unique<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

fn lang_or_unknown(lang: Option<&String>) -> &str {
    lang.map(String::as_str).filter(|l| !l.is_empty()).unwrap_or("?")
}

fn format_torrent(t: &TorrentInfo, compact: bool) -> String {
    let mut out = format!(
        "  - {} ({}) | {} seeders",
        quality_label(t),
        format_size(t.size_bytes.as_deref()),
        t.seeders
    );
    if let Some(score) = t.quality_score {
        out.push_str(&format!(" | Score: {score}"));
    }
    if let Some(season) = t.season {
        out.push_str(&format!(" | {}", episode_tag(season, t.episode)));
    }

    out.push_str(&format!("\n    Info hash: {}", t.info_hash));
    if compact {
        out.push_str(&format!(
            "\n    Magnet: magnet:?xt=urn:btih:{}",
            t.info_hash.to_lowercase()
        ));
    } else if let Some(magnet) = t.magnet_url.as_deref().filter(|m| !m.is_empty()) {
        out.push_str(&format!("\n    Magnet: {magnet}"));
    }
    if let Some(url) = t.torrent_url.as_deref().filter(|u| !u.is_empty()) {
        out.push_str(&format!("\n    Torrent: {url}"));
    }

    if let Some(tracks) = t.audio_tracks.as_deref().filter(|a| !a.is_empty()) {
        let langs = unique(tracks.iter().map(|a| lang_or_unknown(a.lang.as_ref())));
        out.push_str(&format!("\n    Audio: {}", langs.join(", ")));
        let codecs = unique(tracks.iter().filter_map(|a| a.codec.as_deref()));
        if !codecs.is_empty() {
            out.push_str(&format!(" ({})", codecs.join(", ")));
        }
    }
    if let Some(tracks) = t.subtitle_tracks.as_deref().filter(|s| !s.is_empty()) {
        let langs = unique(tracks.iter().map(|s| lang_or_unknown(s.lang.as_ref())));
        out.push_str(&format!("\n    Subtitles: {}", langs.join(", ")));
    }

    out
}

fn push_torrents(lines: &mut Vec<String>, r: &SearchResult, opts: &FormatOptions) {
    let total = r.torrents.len();
    if total == 0 {
        lines.push("   No torrents available".to_string());
        return;
    }

    let (top, matching) = select_torrents(&r.torrents, opts);
    if top.is_empty() {
        // only reachable with a season filter
        let wanted = match (opts.season, opts.episode_filter()) {
            (Some(s), Some(e)) => episode_tag(s, Some(e)),
            (Some(s), None) => format!("season {s}"),
            _ => String::new(),
        };
        lines.push(format!(
            "   No torrents available for {wanted} ({total} torrents available for other seasons)"
        ));
        return;
    }

    if opts.season.is_some() {
        lines.push(format!(
            "   Torrents ({matching} matching, {total} total, top {}):",
            top.len()
        ));
    } else {
        lines.push(format!("   Torrents ({total} total, top {}):", top.len()));
    }
    lines.extend(top.into_iter().map(|t| format_torrent(t, opts.compact)));
}

fn streaming_line(streaming: &StreamingInfo) -> Option<String> {
    let names = |providers: &[crate::client::StreamingProvider]| {
        providers
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mut parts = Vec::new();
    if !streaming.flatrate.is_empty() {
        parts.push(format!("Stream: {}", names(&streaming.flatrate)));
    }
    if !streaming.free.is_empty() {
        parts.push(format!("Free: {}", names(&streaming.free)));
    }
    (!parts.is_empty()).then(|| format!("   {}", parts.join(" | ")))
}

fn format_result(r: &SearchResult, index: usize, opts: &FormatOptions) -> String {
    let mut lines = vec![
        format!(
            "{index}. {}{} [{}]",
            r.title,
            year_suffix(r.year),
            r.content_type
        ),
        format!(
            "   {}",
            format_rating(r.rating_imdb.as_deref(), r.rating_tmdb.as_deref())
        ),
    ];
    if let Some(genres) = r.genres.as_deref().filter(|g| !g.is_empty()) {
        lines.push(format!("   Genres: {}", genres.join(", ")));
    }
    if let Some(overview) = r.overview.as_deref().filter(|o| !o.is_empty()) {
        lines.push(format!("   {}", truncate(overview, OVERVIEW_MAX_CHARS)));
    }

    push_torrents(&mut lines, r, opts);

    if let Some(line) = r.streaming.as_ref().and_then(streaming_line) {
        lines.push(line);
    }

    lines.push(format!(
        "   Content ID: {id} — use with get_watch_providers(content_id={id}) or get_credits(content_id={id})",
        id = r.id
    ));
    if let Some(imdb) = r.imdb_id.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("   IMDb: {imdb}"));
    }
    if let Some(url) = r.content_url.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("   URL: {url}"));
    }

    lines.join("\n")
}

/// Render a search response
#[must_use]
pub fn format_search_results(data: &SearchResponse, opts: &FormatOptions) -> String {
    if data.results.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut lines = vec![format!(
        "Found {} results (page {}, showing {}):",
        data.total,
        data.page,
        data.results.len()
    )];
    if let Some(season) = data.parsed_season {
        lines.push(format!(
            "Detected season/episode: {}",
            episode_tag(season, data.parsed_episode)
        ));
    }
    lines.push(String::new());
    lines.extend(
        data.results
            .iter()
            .enumerate()
            .map(|(i, r)| format_result(r, i + 1, opts)),
    );
    lines.join("\n")
}

/// Render the popularity ranking
#[must_use]
pub fn format_popular_results(data: &PopularResponse) -> String {
    if data.items.is_empty() {
        return "No popular content found.".to_string();
    }

    let mut lines = vec![
        format!("Popular content ({} total, page {}):", data.total, data.page),
        BROWSE_HINT.to_string(),
        String::new(),
    ];
    lines.extend(data.items.iter().enumerate().map(|(i, item)| {
        format!(
            "{}. {}{} [{}] — {} — {} clicks — ID: {}",
            i + 1,
            item.title,
            year_suffix(item.year),
            item.content_type,
            format_rating(item.rating_imdb.as_deref(), item.rating_tmdb.as_deref()),
            item.click_count,
            item.id
        )
    }));
    lines.join("\n")
}

/// `Jan 5, 2026` in UTC; unparseable timestamps are shown as received
fn added_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map_or_else(
            |_| raw.to_string(),
            |d| d.with_timezone(&Utc).format("%b %-d, %Y").to_string(),
        )
}

/// Render the recently-added list
#[must_use]
pub fn format_recent_results(data: &RecentResponse) -> String {
    if data.items.is_empty() {
        return "No recent content found.".to_string();
    }

    let mut lines = vec![
        format!(
            "Recently added content ({} total, page {}):",
            data.total, data.page
        ),
        BROWSE_HINT.to_string(),
        String::new(),
    ];
    lines.extend(data.items.iter().enumerate().map(|(i, item)| {
        format!(
            "{}. {}{} [{}] — {} — Added: {} — ID: {}",
            i + 1,
            item.title,
            year_suffix(item.year),
            item.content_type,
            format_rating(item.rating_imdb.as_deref(), item.rating_tmdb.as_deref()),
            added_date(&item.created_at),
            item.id
        )
    }));
    lines.join("\n")
}

/// Render type-ahead suggestions for `query`
#[must_use]
pub fn format_autocomplete(query: &str, data: &AutocompleteResponse) -> String {
    if data.suggestions.is_empty() {
        return format!("No suggestions for \"{query}\". Try search_content for a full search.");
    }
    let lines: Vec<String> = data
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{}. {}{} [{}] — ID: {}",
                i + 1,
                s.title,
                year_suffix(s.year),
                s.content_type,
                s.id
            )
        })
        .collect();
    format!("Suggestions for \"{query}\":\n{}", lines.join("\n"))
}
