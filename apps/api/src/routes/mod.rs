pub mod health;
pub mod ui;

use axum::{
    routing::{get, post},
    Router,
};

use crate::listings::handlers as listings;
use crate::state::AppState;
use crate::summary::handlers as summary;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        // Listings API
        .route("/api/v1/listings/search", post(listings::handle_search))
        .route("/api/v1/sessions/:id", get(listings::handle_get_session))
        .route("/api/v1/sessions/:id/export", get(listings::handle_export))
        // Summary + email
        .route(
            "/api/v1/sessions/:id/summary",
            post(summary::handle_generate_and_send),
        )
        .with_state(state)
}
