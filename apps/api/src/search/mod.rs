//! Job search client: the only module that talks to the search provider.
//!
//! `AppState` carries an `Arc<dyn JobSearch>` so the listing pipeline can run against
//! a fake in tests.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

pub mod models;

use models::{RawJob, SearchResponse};

/// Engine identifier sent with every request.
pub const ENGINE: &str = "google_jobs";
const SEARCH_PATH: &str = "/search.json";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[async_trait]
pub trait JobSearch: Send + Sync {
    /// Runs one free-text query and returns the raw results in provider order.
    async fn search(&self, query: &str) -> Result<Vec<RawJob>, SearchError>;
}

/// SerpAPI-backed search client.
#[derive(Clone)]
pub struct SerpApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SerpApiClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl JobSearch for SerpApiClient {
    async fn search(&self, query: &str) -> Result<Vec<RawJob>, SearchError> {
        debug!("Searching {ENGINE} for '{query}'");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, SEARCH_PATH))
            .query(&[("engine", ENGINE), ("q", query), ("api_key", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<SearchResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or(body);
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json().await?;
        if let Some(error) = &body.error {
            // Quota exhaustion and "no results" both arrive as 200 + `error`.
            warn!("Search engine reported: {error}");
        }

        debug!("Search returned {} results", body.jobs_results.len());
        Ok(body.jobs_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> SerpApiClient {
        SerpApiClient::new(server.url(), "test-key".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_search_sends_engine_query_and_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("engine".into(), "google_jobs".into()),
                Matcher::UrlEncoded("q".into(), "Data Scientist in New York".into()),
                Matcher::UrlEncoded("api_key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jobs_results": [{"title": "Data Scientist", "company_name": "Acme"}]}"#)
            .create_async()
            .await;

        let jobs = client_for(&server)
            .search("Data Scientist in New York")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title.as_deref(), Some("Data Scientist"));
    }

    #[tokio::test]
    async fn test_search_engine_error_yields_empty_results() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"error": "Google hasn't returned any results for this query."}"#)
            .create_async()
            .await;

        let jobs = client_for(&server).search("nothing in nowhere").await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_search_http_failure_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search.json")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error": "Invalid API key."}"#)
            .create_async()
            .await;

        let err = client_for(&server).search("x in y").await.unwrap_err();
        match err {
            SearchError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
