//! AI job-market summary: prompt building, the model call, and the acceptance check.
//!
//! A failed or rejected summary is never an error for the caller. It becomes a
//! placeholder text that names the failure, and the send flow carries on with it.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{LanguageModel, LlmError};
use crate::models::listing::Listing;

pub mod builder;
pub mod handlers;
pub mod prompts;

const FILLER_PHRASE: &str = "great answer";
const MIN_WORDS: usize = 10;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("no listings to summarize")]
    EmptyDataset,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV flush error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("{0}")]
    Rejected(RejectReason),
}

/// Why a model response was judged uninformative.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    FillerPhrase,
    TooShort { words: usize },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::FillerPhrase => write!(
                f,
                "Uninformative summary output received (contains \"{FILLER_PHRASE}\")."
            ),
            RejectReason::TooShort { words } => write!(
                f,
                "Uninformative summary output received ({words} words, need at least {MIN_WORDS})."
            ),
        }
    }
}

/// Acceptance heuristic for model output: rejects agent filler ("great answer", any
/// case) and anything under ten whitespace-separated words. Returns the trimmed text.
pub fn accept_summary(raw: &str) -> Result<&str, RejectReason> {
    let text = raw.trim();

    if text.to_lowercase().contains(FILLER_PHRASE) {
        return Err(RejectReason::FillerPhrase);
    }

    let words = text.split_whitespace().count();
    if words < MIN_WORDS {
        return Err(RejectReason::TooShort { words });
    }

    Ok(text)
}

pub fn placeholder(error: &SummaryError) -> String {
    format!("⚠️ AI summary could not be generated properly. Error: {error}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSummary {
    pub text: String,
    /// False when `text` is the placeholder.
    pub accepted: bool,
}

async fn try_generate(llm: &dyn LanguageModel, listings: &[Listing]) -> Result<String, SummaryError> {
    let prompt = builder::build_prompt(listings)?;
    let raw = llm.complete(&prompt, prompts::ANALYST_SYSTEM).await?;
    let text = accept_summary(&raw).map_err(SummaryError::Rejected)?;
    Ok(text.to_string())
}

/// Generates the summary for the given listings. Never fails: errors and rejected
/// output come back as the placeholder text.
pub async fn generate_summary(llm: &dyn LanguageModel, listings: &[Listing]) -> GeneratedSummary {
    match try_generate(llm, listings).await {
        Ok(text) => {
            info!("Generated summary for {} listings", listings.len());
            GeneratedSummary {
                text,
                accepted: true,
            }
        }
        Err(e) => {
            warn!("Summary generation failed: {e}");
            GeneratedSummary {
                text: placeholder(&e),
                accepted: false,
            }
        }
    }
}
