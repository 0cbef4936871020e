// Job listings: normalization, recency buckets, the search pipeline and its endpoints.
// All provider calls go through `search::JobSearch`.

pub mod handlers;
pub mod normalizer;
pub mod pipeline;
pub mod recency;

use bytes::Bytes;

use crate::export::{write_listings_xlsx, ExportError};
use crate::models::listing::Listing;
use crate::search::JobSearch;
use pipeline::{aggregate_by_company, classify_and_filter};
use recency::RecencyFilter;

/// Everything a search produces for the session.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub listings: Vec<Listing>,
    pub company_summary: String,
    pub spreadsheet: Option<Bytes>,
    pub notice: Option<String>,
}

/// Fetch → normalize → classify → filter → aggregate → export.
///
/// The spreadsheet is produced whenever the provider returned anything, even if the
/// filter then removed every row.
pub async fn run_search(
    client: &dyn JobSearch,
    job_title: &str,
    location: &str,
    filter: RecencyFilter,
) -> Result<SearchResult, ExportError> {
    let outcome = pipeline::search(client, job_title, location).await;
    let fetched = outcome.records.len();

    let listings = classify_and_filter(outcome.records, filter);
    let company_summary = aggregate_by_company(&listings).display();
    let spreadsheet = if fetched > 0 {
        Some(Bytes::from(write_listings_xlsx(&listings)?))
    } else {
        None
    };

    tracing::info!(
        "Search kept {} of {} listings (filter: {})",
        listings.len(),
        fetched,
        filter.label()
    );

    Ok(SearchResult {
        listings,
        company_summary,
        spreadsheet,
        notice: outcome.notice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::recency::RecencyCategory;
    use crate::test_support::{raw_job, FakeSearch};

    #[tokio::test]
    async fn test_run_search_filters_and_aggregates() {
        let search = FakeSearch::with_jobs(vec![
            raw_job("Acme", "LinkedIn", "2 days ago"),
            raw_job("Globex", "Indeed", "20 days ago"),
            raw_job("Globex", "Indeed", "3 days ago"),
        ]);

        let result = run_search(
            &search,
            "Data Scientist",
            "New York",
            RecencyFilter::Only(RecencyCategory::Last7Days),
        )
        .await
        .unwrap();

        assert_eq!(result.listings.len(), 2);
        assert_eq!(result.company_summary, "Acme - 1 job, Globex - 1 job");
        assert!(result.spreadsheet.is_some());
        assert!(result.notice.is_none());
    }

    #[tokio::test]
    async fn test_run_search_filtered_to_nothing_keeps_spreadsheet() {
        let search = FakeSearch::with_jobs(vec![raw_job("Acme", "LinkedIn", "2 days ago")]);

        let result = run_search(
            &search,
            "Data Scientist",
            "New York",
            RecencyFilter::Only(RecencyCategory::Older),
        )
        .await
        .unwrap();

        assert!(result.listings.is_empty());
        assert_eq!(result.company_summary, "");
        assert!(result.spreadsheet.is_some());
    }

    #[tokio::test]
    async fn test_run_search_without_results() {
        let search = FakeSearch::with_jobs(vec![]);
        let result = run_search(&search, "x", "y", RecencyFilter::All).await.unwrap();
        assert!(result.listings.is_empty());
        assert!(result.spreadsheet.is_none());
        assert_eq!(result.notice.as_deref(), Some(pipeline::NO_RESULTS_NOTICE));
    }
}
