use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use letters_core::MessageEvent;
use tokio::sync::broadcast::error::RecvError;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dto;
mod error;
mod routers;
mod service;

#[cfg(test)]
mod tests;

use config::{Args, Settings};
use dto::HealthResponse;
use service::LettersService;

/// Health check endpoint
#[instrument(skip_all)]
async fn healthcheck(
    Extension(service): Extension<Arc<LettersService>>,
) -> (StatusCode, Json<HealthResponse>) {
    if service.is_healthy().await {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy".to_string(),
            }),
        )
    }
}

/// Build the router around an existing service
fn build_app(service: Arc<LettersService>) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .merge(routers::create_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
                .layer(CorsLayer::permissive())
                .layer(Extension(service)),
        )
}

/// Log store writes as they happen
fn spawn_event_logger(service: &LettersService) {
    let mut events = service.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(MessageEvent::Inserted(m)) => debug!("Message {} inserted for {}", m.id, m.name),
                Ok(event) => debug!("Message {} changed: {:?}", event.message().id, event),
                Err(RecvError::Lagged(skipped)) => warn!("Event logger skipped {} events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Initialize the Axum web server
fn create_app(settings: &Settings) -> Result<Router, anyhow::Error> {
    // Initialize letters service
    let letters_service = Arc::new(LettersService::new(settings)?);
    spawn_event_logger(&letters_service);

    Ok(build_app(letters_service))
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "letters_server=debug,letters_core=debug,tower_http=debug,axum::rejection=trace"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let args = Args::parse();
    let settings = Settings::load(&args)?;
    info!("Starting letters server with settings: {:?}", settings);

    // Create the app
    let app = create_app(&settings)?;

    // Start the server
    let listener = tokio::net::TcpListener::bind(&settings.server_address()).await?;
    info!("Server listening on {}", settings.server_address());

    axum::serve(listener, app).await?;

    Ok(())
}
