//! Canned prompts that steer a model through the tools

use std::collections::HashMap;

use crate::error::rpc_codes;
use crate::protocol::{Prompt, PromptArgument, PromptMessage, PromptsGetResult};
use crate::{Error, Result};

const PRESENTATION_GUIDE_PROMPT: &str = "\
When presenting torrent search results to users, follow these practices:

1. **Magnet Links**: always make them clickable with markdown:
   - [📥 Download](magnet:?xt=urn:btih:HASH...)
   - or [🧲 Magnet Link](magnet:?xt=urn:btih:HASH...)
   - never print a raw magnet URI

2. **Content URL**: include the TorrentClaw page for browsing every season and episode:
   - [🔗 View all seasons on TorrentClaw](https://torrentclaw.com/shows/...)

3. **Layout**:
   - group TV results by season and episode
   - show quality, size and seeders prominently
   - highlight torrents with active seeders
   - warn when a torrent has 0 seeders

4. **Example for a TV show**:
   **Entrevías - Season 4**

   **Episode 1** (S04E01)
   - 720p HDTV • 879 MB • 6 seeders [📥 Download](magnet:?xt=...)

   **Episode 2** (S04E02)
   - 1080p WEB-DL • 2.5 GB • 0 seeders ⚠️ [📥 Download](magnet:?xt=...)
   - 720p HDTV • 976 MB • 1 seeder [📥 Download](magnet:?xt=...)

   [🔗 View all seasons on TorrentClaw](URL)

5. **Guidance**:
   - recommend the torrents with more seeders
   - suggest alternatives when the requested season or episode has no seeders
   - offer another quality if the user wants one

Apply these practices so results are actionable.";

fn argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        description: Some(description.to_string()),
        required,
    }
}

/// Definitions for `prompts/list`
#[must_use]
pub fn prompt_definitions() -> Vec<Prompt> {
    vec![
        Prompt {
            name: "presentation_guide".to_string(),
            description: Some(
                "How to present torrent search results in a user-friendly format".to_string(),
            ),
            arguments: vec![],
        },
        Prompt {
            name: "search_movie".to_string(),
            description: Some("Find a movie by title and list its torrent options".to_string()),
            arguments: vec![argument("title", "Movie title to search for", true)],
        },
        Prompt {
            name: "search_show".to_string(),
            description: Some("Find a TV show by title and list its torrent options".to_string()),
            arguments: vec![
                argument("title", "TV show title to search for", true),
                argument("season", "Season number", false),
            ],
        },
        Prompt {
            name: "whats_new".to_string(),
            description: Some("Browse recently added movies and TV shows".to_string()),
            arguments: vec![],
        },
        Prompt {
            name: "where_to_watch".to_string(),
            description: Some("Find which streaming services carry a title".to_string()),
            arguments: vec![
                argument("title", "Movie or TV show title", true),
                argument("country", "2-letter country code (e.g. US, ES)", false),
            ],
        },
    ]
}

fn required<'a>(prompt: &str, args: &'a HashMap<String, String>, key: &str) -> Result<&'a str> {
    args.get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            Error::json_rpc(
                rpc_codes::INVALID_PARAMS,
                format!("Missing required argument '{key}' for prompt '{prompt}'"),
            )
        })
}

fn optional<'a>(args: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    args.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn render(name: &str, args: &HashMap<String, String>) -> Result<String> {
    let text = match name {
        "presentation_guide" => PRESENTATION_GUIDE_PROMPT.to_string(),
        "search_movie" => {
            let title = required(name, args, "title")?;
            format!(
                "Search for the movie \"{title}\" using search_content with type=\"movie\". \
                 Present the results with clickable markdown magnet links [📥 Download](magnet:...), \
                 include the content URL for more details, and show quality, size and seeders \
                 clearly. If anything is found, also call get_watch_providers with the \
                 content_id to check streaming availability."
            )
        }
        "search_show" => {
            let title = required(name, args, "title")?;
            let season = match optional(args, "season") {
                Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                    Error::json_rpc(
                        rpc_codes::INVALID_PARAMS,
                        format!("Argument 'season' must be a number, got '{raw}'"),
                    )
                })?),
                None => None,
            };
            let season_clause = season.map_or_else(String::new, |s| format!(" and season={s}"));
            format!(
                "Search for the TV show \"{title}\" using search_content with type=\"show\"{season_clause}. \
                 Present results grouped by episode with:\n\
                 - Episode identifier (e.g. S04E01)\n\
                 - Quality, size and seeder count\n\
                 - Clickable markdown magnet links: [📥 Download](magnet:...)\n\
                 - Content URL for browsing all seasons: [🔗 View all seasons](URL)\n\
                 - Recommendations for the torrents with most seeders\n\
                 - Warnings for torrents with 0 seeders"
            )
        }
        "whats_new" => "Use get_recent to show the most recently added movies and TV shows. \
                        Present each with its title, year, type (movie/show) and ratings."
            .to_string(),
        "where_to_watch" => {
            let title = required(name, args, "title")?;
            let country = optional(args, "country").unwrap_or("US");
            format!(
                "Search for \"{title}\" using search_content with country=\"{country}\". \
                 Show the streaming availability (which services offer it by subscription, \
                 rent or purchase) and the best torrent download options."
            )
        }
        other => {
            return Err(Error::json_rpc(
                rpc_codes::INVALID_PARAMS,
                format!("Unknown prompt: {other}"),
            ));
        }
    };
    Ok(text)
}

/// Expand a prompt for `prompts/get`
///
/// # Errors
///
/// `INVALID_PARAMS` for an unknown prompt or a missing/invalid argument.
pub fn get_prompt(name: &str, args: &HashMap<String, String>) -> Result<PromptsGetResult> {
    let text = render(name, args)?;
    let description = prompt_definitions()
        .into_iter()
        .find(|p| p.name == name)
        .and_then(|p| p.description);
    Ok(PromptsGetResult {
        description,
        messages: vec![PromptMessage::user(text)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Content;

    fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn text_of(result: &PromptsGetResult) -> &str {
        match &result.messages[0].content {
            Content::Text { text } => text,
        }
    }

    #[test]
    fn five_prompts_listed() {
        let names: Vec<String> = prompt_definitions().into_iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            ["presentation_guide", "search_movie", "search_show", "whats_new", "where_to_watch"]
        );
    }

    #[test]
    fn search_movie_embeds_title() {
        let result = get_prompt("search_movie", &args(&[("title", "Inception")])).unwrap();
        assert_eq!(result.messages[0].role, "user");
        assert!(text_of(&result).starts_with(
            "Search for the movie \"Inception\" using search_content with type=\"movie\"."
        ));
    }

    #[test]
    fn search_show_season_is_optional() {
        let without = get_prompt("search_show", &args(&[("title", "Bluey")])).unwrap();
        assert!(text_of(&without).contains("type=\"show\". Present"));

        let with = get_prompt("search_show", &args(&[("title", "Bluey"), ("season", "2")])).unwrap();
        assert!(text_of(&with).contains("type=\"show\" and season=2."));
    }

    #[test]
    fn search_show_rejects_non_numeric_season() {
        let err = get_prompt("search_show", &args(&[("title", "Bluey"), ("season", "two")]))
            .unwrap_err();
        assert_eq!(err.to_rpc_code(), rpc_codes::INVALID_PARAMS);
    }

    #[test]
    fn where_to_watch_defaults_to_us() {
        let result = get_prompt("where_to_watch", &args(&[("title", "Dune")])).unwrap();
        assert!(text_of(&result).contains("with country=\"US\""));

        let result =
            get_prompt("where_to_watch", &args(&[("title", "Dune"), ("country", "ES")])).unwrap();
        assert!(text_of(&result).contains("with country=\"ES\""));
    }

    #[test]
    fn missing_title_is_invalid_params() {
        let err = get_prompt("search_movie", &HashMap::new()).unwrap_err();
        assert_eq!(err.to_rpc_code(), rpc_codes::INVALID_PARAMS);
        assert!(err.to_string().contains("'title'"));
    }

    #[test]
    fn unknown_prompt_rejected() {
        assert!(get_prompt("nope", &HashMap::new()).is_err());
    }

    #[test]
    fn argument_free_prompts() {
        let guide = get_prompt("presentation_guide", &HashMap::new()).unwrap();
        assert!(text_of(&guide).contains("[📥 Download](magnet:?xt=urn:btih:HASH...)"));
        let recent = get_prompt("whats_new", &HashMap::new()).unwrap();
        assert!(text_of(&recent).starts_with("Use get_recent"));
        assert_eq!(
            recent.description.as_deref(),
            Some("Browse recently added movies and TV shows")
        );
    }
}
