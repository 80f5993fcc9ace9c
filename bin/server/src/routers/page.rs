use std::sync::Arc;

use axum::{extract::Extension, response::Html, routing::get, Router};

use crate::service::LettersService;

const INDEX_TEMPLATE: &str = include_str!("../../static/index.html");
const SHOW_ALL_PLACEHOLDER: &str = "__SHOW_ALL__";

/// Create page router
pub fn create_router() -> Router {
    Router::new().route("/", get(index))
}

/// Render the page with the configured display mode baked in
pub fn render_index(show_all: bool) -> String {
    INDEX_TEMPLATE.replace(SHOW_ALL_PLACEHOLDER, if show_all { "true" } else { "false" })
}

async fn index(Extension(service): Extension<Arc<LettersService>>) -> Html<String> {
    Html(render_index(service.display_mode().shows_all()))
}
