//! Recency buckets derived from the free-text "posted" field.
//!
//! This is a substring heuristic over strings like "5 hours ago" or "12 days ago",
//! not a date parser.

use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecencyCategory {
    #[serde(rename = "Last 24 hrs")]
    LastDay,
    #[serde(rename = "Last 7 days")]
    Last7Days,
    #[serde(rename = "Last 30 days")]
    Last30Days,
    #[serde(rename = "Older")]
    Older,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl RecencyCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RecencyCategory::LastDay => "Last 24 hrs",
            RecencyCategory::Last7Days => "Last 7 days",
            RecencyCategory::Last30Days => "Last 30 days",
            RecencyCategory::Older => "Older",
            RecencyCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RecencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies a "posted" string. First matching rule wins:
/// 1. contains "hour" → `LastDay`
/// 2. contains "day" → leading integer N: ≤7 `Last7Days`, ≤30 `Last30Days`,
///    otherwise `Older`; `Unknown` if the leading token is not an integer
/// 3. anything else → `Older`
pub fn classify_posted(posted: &str) -> RecencyCategory {
    let lower = posted.to_lowercase();

    if lower.contains("hour") {
        return RecencyCategory::LastDay;
    }

    if lower.contains("day") {
        let token = posted.split_whitespace().next().unwrap_or_default();
        return match token.parse::<i64>() {
            Ok(n) if n <= 7 => RecencyCategory::Last7Days,
            Ok(n) if n <= 30 => RecencyCategory::Last30Days,
            Ok(_) => RecencyCategory::Older,
            // Counts beyond i64 are still numbers: huge ones are old, huge negatives recent.
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => RecencyCategory::Older,
                IntErrorKind::NegOverflow => RecencyCategory::Last7Days,
                _ => RecencyCategory::Unknown,
            },
        };
    }

    RecencyCategory::Older
}

/// The user-selected recency filter: everything, or exactly one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecencyFilter {
    #[default]
    All,
    Only(RecencyCategory),
}

/// Labels offered by the dashboard selector, in display order.
pub const FILTER_OPTIONS: [&str; 5] = ["All", "Last 24 hrs", "Last 7 days", "Last 30 days", "Older"];

impl RecencyFilter {
    pub fn matches(&self, category: RecencyCategory) -> bool {
        match self {
            RecencyFilter::All => true,
            RecencyFilter::Only(selected) => *selected == category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecencyFilter::All => "All",
            RecencyFilter::Only(category) => category.label(),
        }
    }
}

impl FromStr for RecencyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "All" => Ok(RecencyFilter::All),
            "Last 24 hrs" => Ok(RecencyFilter::Only(RecencyCategory::LastDay)),
            "Last 7 days" => Ok(RecencyFilter::Only(RecencyCategory::Last7Days)),
            "Last 30 days" => Ok(RecencyFilter::Only(RecencyCategory::Last30Days)),
            "Older" => Ok(RecencyFilter::Only(RecencyCategory::Older)),
            other => Err(format!(
                "Unknown date filter '{other}'. Expected one of: {}",
                FILTER_OPTIONS.join(", ")
            )),
        }
    }
}

impl TryFrom<String> for RecencyFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecencyFilter> for String {
    fn from(filter: RecencyFilter) -> Self {
        filter.label().to_string()
    }
}
