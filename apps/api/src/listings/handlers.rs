//! Axum route handlers for searching and reading session listings.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{DOWNLOAD_FILENAME, XLSX_CONTENT_TYPE};
use crate::listings::pipeline::{aggregate_by_company, dashboard_charts, ChartSeries, CompanyCount};
use crate::listings::recency::RecencyFilter;
use crate::listings::run_search;
use crate::models::listing::Listing;
use crate::session::{Session, SessionHandle};
use crate::state::AppState;

const DEFAULT_JOB_TITLE: &str = "Data Scientist";
const DEFAULT_LOCATION: &str = "New York";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub recipient_email: String,
    #[serde(default)]
    pub date_filter: RecencyFilter,
}

/// Everything the dashboard renders for one session.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub job_title: String,
    pub location: String,
    pub recipient_email: String,
    pub date_filter: RecencyFilter,
    pub listings: Vec<Listing>,
    pub company_summary: String,
    pub companies: Vec<CompanyCount>,
    /// Sum of `companies` openings; equals `listings.len()`.
    pub total_openings: usize,
    pub charts: Vec<ChartSeries>,
    pub has_spreadsheet: bool,
    pub summary_text: Option<String>,
    pub notice: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let aggregate = aggregate_by_company(&session.listings);
        Self {
            session_id: session.id,
            job_title: session.job_title.clone(),
            location: session.location.clone(),
            recipient_email: session.recipient_email.clone(),
            date_filter: session.date_filter,
            listings: session.listings.clone(),
            company_summary: session.company_summary.clone(),
            total_openings: aggregate.total(),
            companies: aggregate.companies,
            charts: dashboard_charts(&session.listings),
            has_spreadsheet: session.spreadsheet.is_some(),
            summary_text: session.summary_text.clone(),
            notice: session.notice.clone(),
            updated_at: session.updated_at,
        }
    }
}

fn or_default(value: String, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

pub(crate) async fn find_session(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/listings/search
///
/// Runs a new search and replaces the session's dataset, aggregate and spreadsheet.
/// An empty or failed search still succeeds, with `notice` explaining why.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SessionView>, AppError> {
    let job_title = or_default(request.job_title, DEFAULT_JOB_TITLE);
    let location = or_default(request.location, DEFAULT_LOCATION);

    let handle = state.sessions.get_or_create(request.session_id).await;
    let mut session = handle.lock().await;

    let result = run_search(
        state.search.as_ref(),
        &job_title,
        &location,
        request.date_filter,
    )
    .await?;

    session.job_title = job_title;
    session.location = location;
    session.recipient_email = request.recipient_email.trim().to_string();
    session.date_filter = request.date_filter;
    session.replace_dataset(
        result.listings,
        result.company_summary,
        result.spreadsheet,
        result.notice,
    );

    Ok(Json(SessionView::from(&*session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionView::from(&*session)))
}

/// GET /api/v1/sessions/:id/export
///
/// Downloads the spreadsheet generated by the last search.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;

    let spreadsheet = session.spreadsheet.clone().ok_or_else(|| {
        AppError::NotFound("No spreadsheet yet. Please perform a job search first.".to_string())
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILENAME}\""),
            ),
        ],
        spreadsheet,
    )
        .into_response())
}
