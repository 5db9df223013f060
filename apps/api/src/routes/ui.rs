use axum::response::Html;

/// GET /
/// Static upload form; it posts to the Evaluation API and renders the feedback.
pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}
