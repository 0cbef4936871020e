//! Axum route handler for the "generate summary and send" action.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::listings::handlers::find_session;
use crate::notify::{dispatch, Notification};
use crate::state::AppState;
use crate::summary::generate_summary;

#[derive(Debug, Default, Deserialize)]
pub struct SendSummaryRequest {
    /// Overrides the address captured by the last search.
    #[serde(default)]
    pub recipient_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeliveryOutcome {
    pub sent: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SendSummaryResponse {
    pub session_id: Uuid,
    pub summary: String,
    pub summary_accepted: bool,
    pub delivery: DeliveryOutcome,
}

/// POST /api/v1/sessions/:id/summary
///
/// Generates the AI summary for the session's listings, stores it, and emails it with
/// the company aggregate and the spreadsheet attached. Missing prerequisites are a
/// 400; a failed delivery is reported in `delivery` alongside the summary.
pub async fn handle_generate_and_send(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SendSummaryRequest>,
) -> Result<Json<SendSummaryResponse>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;

    // The override is stored only once every precondition has passed.
    let recipient = request
        .recipient_email
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| session.recipient_email.clone());

    if recipient.is_empty() {
        return Err(AppError::Validation(
            "Please provide a valid recipient email address.".to_string(),
        ));
    }
    if session.listings.is_empty() {
        return Err(AppError::Validation(
            "Please perform a job search first.".to_string(),
        ));
    }
    if session.company_summary.is_empty() {
        return Err(AppError::Validation(
            "Company-wise summary is missing. Please perform a job search first.".to_string(),
        ));
    }
    session.recipient_email = recipient;

    let summary = generate_summary(state.llm.as_ref(), &session.listings).await;
    session.summary_text = Some(summary.text.clone());
    session.touch();

    let notification = Notification {
        summary: &summary.text,
        company_summary: &session.company_summary,
        spreadsheet: session.spreadsheet.as_deref(),
    };
    let delivery = match dispatch(
        state.mailer.as_ref(),
        &state.config.email_address,
        &session.recipient_email,
        &notification,
    )
    .await
    {
        Ok(()) => DeliveryOutcome {
            sent: true,
            message: "Summary and Excel file sent successfully!".to_string(),
        },
        Err(e) => DeliveryOutcome {
            sent: false,
            message: format!("Failed to send email: {e}"),
        },
    };

    Ok(Json(SendSummaryResponse {
        session_id: session.id,
        summary: summary.text,
        summary_accepted: summary.accepted,
        delivery,
    }))
}
