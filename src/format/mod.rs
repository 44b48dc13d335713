//! Plain-text rendering of API responses
//!
//! Everything here is pure. Phrasing, field order and count wording are
//! relied on by MCP clients and must stay stable.

mod content;
mod details;

pub use content::{
    FormatOptions, format_autocomplete, format_popular_results, format_recent_results,
    format_search_results,
};
pub use details::{format_credits, format_scan_status, format_watch_providers};

const GIB: f64 = 1_073_741_824.0;
const MIB: f64 = 1_048_576.0;
const KIB: f64 = 1024.0;

/// Human-readable size from a decimal byte count
///
/// Leading digits are parsed the way a lenient integer parse would; no
/// digits at all renders `?`.
#[must_use]
pub fn format_size(bytes: Option<&str>) -> String {
    let Some(raw) = bytes else {
        return "?".to_string();
    };
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    let Ok(b) = digits.parse::<u64>() else {
        return "?".to_string();
    };

    #[allow(clippy::cast_precision_loss)]
    let b = b as f64;
    if b >= GIB {
        format!("{:.1} GB", (b / GIB * 10.0).round() / 10.0)
    } else if b >= MIB {
        format!("{:.0} MB", (b / MIB).round())
    } else {
        format!("{:.0} KB", (b / KIB).round())
    }
}

/// `IMDb: x | TMDB: y`, either half optional, or `No ratings`
#[must_use]
pub fn format_rating(imdb: Option<&str>, tmdb: Option<&str>) -> String {
    let parts: Vec<String> = [("IMDb", imdb), ("TMDB", tmdb)]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| format!("{label}: {v}"))
        })
        .collect();
    if parts.is_empty() {
        "No ratings".to_string()
    } else {
        parts.join(" | ")
    }
}

/// Cut `text` to at most `max` characters, marking the cut with `...`
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// `S04`, `S04E01`
fn episode_tag(season: u32, episode: Option<u32>) -> String {
    match episode {
        Some(e) => format!("S{season:02}E{e:02}"),
        None => format!("S{season:02}"),
    }
}

/// ` (2019)` or nothing
fn year_suffix(year: Option<i32>) -> String {
    match year {
        Some(y) if y != 0 => format!(" ({y})"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_thresholds() {
        assert_eq!(format_size(Some("1073741824")), "1.0 GB");
        assert_eq!(format_size(Some("2684354560")), "2.5 GB");
        assert_eq!(format_size(Some("524288000")), "500 MB");
        assert_eq!(format_size(Some("1048576")), "1 MB");
        assert_eq!(format_size(Some("512000")), "500 KB");
        assert_eq!(format_size(Some("0")), "0 KB");
    }

    #[test]
    fn size_unknown() {
        assert_eq!(format_size(None), "?");
        assert_eq!(format_size(Some("")), "?");
        assert_eq!(format_size(Some("abc")), "?");
    }

    #[test]
    fn size_ignores_trailing_garbage() {
        assert_eq!(format_size(Some("524288000 bytes")), "500 MB");
    }

    #[test]
    fn rating_variants() {
        assert_eq!(format_rating(Some("8.7"), Some("8.2")), "IMDb: 8.7 | TMDB: 8.2");
        assert_eq!(format_rating(None, Some("6.1")), "TMDB: 6.1");
        assert_eq!(format_rating(None, None), "No ratings");
        assert_eq!(format_rating(Some(""), None), "No ratings");
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("short", 200), "short");
        let exact = "x".repeat(200);
        assert_eq!(truncate(&exact, 200), exact);
    }

    #[test]
    fn truncate_marks_cut() {
        let long = "y".repeat(250);
        let cut = truncate(&long, 200);
        assert_eq!(cut.chars().count(), 200);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        let long = "é".repeat(300);
        let cut = truncate(&long, 200);
        assert_eq!(cut.chars().count(), 200);
    }

    #[test]
    fn tags_are_zero_padded() {
        assert_eq!(episode_tag(4, Some(1)), "S04E01");
        assert_eq!(episode_tag(12, None), "S12");
        assert_eq!(episode_tag(1, Some(105)), "S01E105");
    }
}
