//! Credits, watch providers and scan status

use crate::client::{CreditsResponse, ScanRequestResponse, WatchProviderItem, WatchProvidersResponse};

/// Render director and cast
#[must_use]
pub fn format_credits(data: &CreditsResponse) -> String {
    let mut lines = vec![format!("Credits for content #{}:", data.content_id), String::new()];

    if let Some(director) = data.director.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("  Director: {director}"));
    }

    if data.cast.is_empty() {
        lines.push("  No cast information available.".to_string());
    } else {
        lines.push("  Cast:".to_string());
        for member in &data.cast {
            if member.character.is_empty() {
                lines.push(format!("    - {}", member.name));
            } else {
                lines.push(format!("    - {} as {}", member.name, member.character));
            }
        }
    }

    lines.join("\n")
}

fn provider_section(label: &str, providers: &[WatchProviderItem]) -> Option<String> {
    if providers.is_empty() {
        return None;
    }
    let mut sorted: Vec<&WatchProviderItem> = providers.iter().collect();
    sorted.sort_by_key(|p| p.display_priority);
    let names: Vec<&str> = sorted.iter().map(|p| p.name.as_str()).collect();
    Some(format!("  {label}: {}", names.join(", ")))
}

/// Render watch providers for one country
#[must_use]
pub fn format_watch_providers(data: &WatchProvidersResponse) -> String {
    let mut lines = vec![
        format!(
            "Watch providers for content #{} in {}:",
            data.content_id, data.country
        ),
        String::new(),
    ];

    let providers = &data.providers;
    let sections: Vec<String> = [
        ("Stream", &providers.flatrate),
        ("Free", &providers.free),
        ("Rent", &providers.rent),
        ("Buy", &providers.buy),
    ]
    .into_iter()
    .filter_map(|(label, items)| provider_section(label, items))
    .collect();

    if sections.is_empty() {
        lines.push(format!("  No watch providers found in {}.", data.country));
    } else {
        lines.extend(sections);
    }

    if let Some(vpn) = &data.vpn_suggestion {
        lines.push(String::new());
        lines.push(format!(
            "  Available in other countries: {}",
            vpn.available_in.join(", ")
        ));
    }

    lines.push(String::new());
    lines.push(data.attribution.clone());

    lines.join("\n")
}

/// Render a scan status lookup for `info_hash`
#[must_use]
pub fn format_scan_status(info_hash: &str, data: &ScanRequestResponse) -> String {
    let mut lines = vec![
        format!("Scan status for {info_hash}:"),
        format!("  Status: {}", data.status),
    ];
    let optional = [
        ("Source", &data.source),
        ("Submitted", &data.created_at),
        ("Completed", &data.completed_at),
    ];
    for (label, value) in optional {
        if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
            lines.push(format!("  {label}: {v}"));
        }
    }
    lines.join("\n")
}
