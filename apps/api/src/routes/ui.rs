use axum::response::Html;

/// GET /
/// Serves the single-page dashboard.
pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
