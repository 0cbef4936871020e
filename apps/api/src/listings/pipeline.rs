//! Listing pipeline: fetch → normalize → classify → filter → aggregate.

use serde::Serialize;
use tracing::{info, warn};

use crate::listings::normalizer::normalize;
use crate::listings::recency::{classify_posted, RecencyFilter};
use crate::models::listing::{JobRecord, Listing};
use crate::search::JobSearch;

pub const NO_RESULTS_NOTICE: &str = "No jobs found or API limit reached.";
const TOP_LOCATIONS: usize = 10;

/// Result of one search. `notice` is set whenever the user should be told why the
/// list is empty.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub records: Vec<JobRecord>,
    pub notice: Option<String>,
}

pub fn build_query(job_title: &str, location: &str) -> String {
    format!("{job_title} in {location}")
}

/// Runs the search and normalizes every result. Collaborator failures become a
/// notice and an empty record list; this never errors.
pub async fn search(client: &dyn JobSearch, job_title: &str, location: &str) -> SearchOutcome {
    let query = build_query(job_title, location);

    match client.search(&query).await {
        Ok(raw) if raw.is_empty() => {
            info!("Search '{query}' returned no results");
            SearchOutcome {
                records: Vec::new(),
                notice: Some(NO_RESULTS_NOTICE.to_string()),
            }
        }
        Ok(raw) => {
            let records: Vec<JobRecord> = raw.iter().map(normalize).collect();
            info!("Search '{query}' returned {} listings", records.len());
            SearchOutcome {
                records,
                notice: None,
            }
        }
        Err(e) => {
            warn!("Search '{query}' failed: {e}");
            SearchOutcome {
                records: Vec::new(),
                notice: Some(format!("Error fetching jobs: {e}")),
            }
        }
    }
}

/// Attaches a recency category to every record and keeps only those the filter
/// accepts. Rejected records are dropped, not hidden.
pub fn classify_and_filter(records: Vec<JobRecord>, filter: RecencyFilter) -> Vec<Listing> {
    records
        .into_iter()
        .map(|record| {
            let date_posted_category = classify_posted(&record.posted);
            Listing {
                record,
                date_posted_category,
            }
        })
        .filter(|listing| filter.matches(listing.date_posted_category))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyCount {
    pub company: String,
    pub openings: usize,
}

/// Per-company listing counts in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub companies: Vec<CompanyCount>,
}

impl AggregateSummary {
    pub fn total(&self) -> usize {
        self.companies.iter().map(|c| c.openings).sum()
    }

    /// "Acme - 1 job, Globex - 2 openings"
    pub fn display(&self) -> String {
        self.companies
            .iter()
            .map(|c| {
                let noun = if c.openings == 1 { "job" } else { "openings" };
                format!("{} - {} {}", c.company, c.openings, noun)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn aggregate_by_company(listings: &[Listing]) -> AggregateSummary {
    AggregateSummary {
        companies: tally(listings.iter().map(|l| l.record.company.as_str()))
            .into_iter()
            .map(|(company, openings)| CompanyCount { company, openings })
            .collect(),
    }
}

/// Counts distinct values in first-seen order.
fn tally<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| seen.as_str() == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value.to_string(), 1)),
        }
    }
    counts
}

/// Counts distinct values, most frequent first; ties keep first-seen order.
pub fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts = tally(values);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Most frequent value and its count, or `None` for an empty input.
pub fn most_common<'a>(values: impl Iterator<Item = &'a str>) -> Option<(String, usize)> {
    value_counts(values).into_iter().next()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: &'static str,
    pub column: &'static str,
    pub points: Vec<ChartPoint>,
}

fn series<'a>(
    title: &'static str,
    column: &'static str,
    values: impl Iterator<Item = &'a str>,
    limit: Option<usize>,
) -> ChartSeries {
    let mut counts = value_counts(values);
    if let Some(limit) = limit {
        counts.truncate(limit);
    }
    ChartSeries {
        title,
        column,
        points: counts
            .into_iter()
            .map(|(label, count)| ChartPoint { label, count })
            .collect(),
    }
}

/// Bar-chart data for the dashboard panel.
pub fn dashboard_charts(listings: &[Listing]) -> Vec<ChartSeries> {
    vec![
        series(
            "Posting Sources",
            "Via",
            listings.iter().map(|l| l.record.via.as_str()),
            None,
        ),
        series(
            "Job Types",
            "Job Type",
            listings.iter().map(|l| l.record.job_type.as_str()),
            None,
        ),
        series(
            "Top Locations",
            "Location",
            listings.iter().map(|l| l.record.location.as_str()),
            Some(TOP_LOCATIONS),
        ),
        series(
            "Experience Levels",
            "Experience Level",
            listings.iter().map(|l| l.record.experience_level.as_str()),
            None,
        ),
        series(
            "Posting Recency",
            "Date Posted Category",
            listings.iter().map(|l| l.date_posted_category.label()),
            None,
        ),
    ]
}
