use axum::Router;

pub mod messages;
pub mod page;

/// Create the main router
pub fn create_router() -> Router {
    Router::new()
        .merge(page::create_router())
        .merge(messages::create_router())
}
