use serde::{Deserialize, Serialize};

use crate::listings::recency::RecencyCategory;

/// Sentinel apply link used when a result carries no related link.
pub const NO_LINK: &str = "#";

/// One normalized job posting. Every field is populated, either from the search
/// result or with its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub apply_link: String,
    pub via: String,
    pub posted: String,
    pub job_type: String,
    pub experience_level: String,
}

impl JobRecord {
    pub fn has_apply_link(&self) -> bool {
        !self.apply_link.is_empty() && self.apply_link != NO_LINK
    }
}

/// A record plus its derived recency bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(flatten)]
    pub record: JobRecord,
    pub date_posted_category: RecencyCategory,
}
