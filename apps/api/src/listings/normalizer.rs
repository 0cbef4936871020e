//! Flattens raw search results into `JobRecord`s.
//!
//! All defaulting happens here; nothing downstream ever sees a missing field.

use crate::models::listing::{JobRecord, NO_LINK};
use crate::search::models::{HighlightGroup, RawJob};

pub const DESCRIPTION_LIMIT: usize = 300;
pub const TRUNCATION_MARKER: &str = "...";

const NOT_AVAILABLE: &str = "N/A";
const DEFAULT_VIA: &str = "Direct";
const DEFAULT_POSTED: &str = "Unknown";

pub fn normalize(raw: &RawJob) -> JobRecord {
    let highlights = raw.job_highlights.as_deref().unwrap_or_default();

    JobRecord {
        title: or_not_available(raw.title.as_deref()),
        company: or_not_available(raw.company_name.as_deref()),
        location: or_not_available(raw.location.as_deref()),
        description: truncate_description(raw.description.as_deref().unwrap_or_default()),
        apply_link: raw
            .related_links
            .as_ref()
            .and_then(|links| links.first())
            .and_then(|link| link.link.clone())
            .unwrap_or_else(|| NO_LINK.to_string()),
        via: raw.via.clone().unwrap_or_else(|| DEFAULT_VIA.to_string()),
        posted: raw
            .detected_extensions
            .as_ref()
            .and_then(|ext| ext.posted_at.clone())
            .unwrap_or_else(|| DEFAULT_POSTED.to_string()),
        job_type: first_highlight_item(highlights.first()),
        experience_level: first_highlight_item(highlights.get(1)),
    }
}

/// Keeps at most `DESCRIPTION_LIMIT` characters and always appends the marker,
/// even when nothing was cut.
pub fn truncate_description(description: &str) -> String {
    let mut truncated: String = description.chars().take(DESCRIPTION_LIMIT).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

fn first_highlight_item(group: Option<&HighlightGroup>) -> String {
    group
        .and_then(|g| g.items.as_ref())
        .and_then(|items| items.first())
        .cloned()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn or_not_available(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}
