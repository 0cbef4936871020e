//! Raw result shapes returned by the `google_jobs` engine.
//!
//! Every field is optional: the engine omits keys freely, and defaults are applied
//! only by `listings::normalizer`.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub jobs_results: Vec<RawJob>,
    /// Set by the engine instead of an HTTP error for quota and empty-query conditions.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJob {
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub via: Option<String>,
    pub job_highlights: Option<Vec<HighlightGroup>>,
    pub related_links: Option<Vec<RelatedLink>>,
    pub detected_extensions: Option<DetectedExtensions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HighlightGroup {
    pub items: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelatedLink {
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectedExtensions {
    pub posted_at: Option<String>,
}
