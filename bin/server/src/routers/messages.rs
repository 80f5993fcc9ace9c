use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use letters_core::LettersError;
use serde_json::Value;
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::{
    dto::{CreateMessageRequest, CreateMessageResponse, ListMessagesQuery, ListMessagesResponse},
    error::ApiError,
    service::LettersService,
};

/// Create messages router
pub fn create_router() -> Router {
    Router::new().route("/messages", get(list_messages).post(create_message))
}

/// List messages, filtered by `name` when given
#[instrument(skip_all)]
async fn list_messages(
    Extension(service): Extension<Arc<LettersService>>,
    query: Result<Query<ListMessagesQuery>, QueryRejection>,
) -> Result<Json<ListMessagesResponse>, ApiError> {
    let Query(query) = query.map_err(|e| {
        error!("Failed to parse list query: {}", e);
        ApiError::Internal
    })?;

    match service.list_messages(query.name.as_deref()).await {
        Ok(messages) => Ok(Json(ListMessagesResponse { messages })),
        Err(e) => {
            error!("Failed to fetch messages: {}", e);
            Err(ApiError::FetchFailed)
        }
    }
}

/// Add a message.
///
/// The body is parsed as JSON regardless of the declared content type.
#[instrument(skip_all)]
async fn create_message(
    Extension(service): Extension<Arc<LettersService>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateMessageResponse>), ApiError> {
    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected request body: {}", e);
        ApiError::InvalidBody
    })?;

    // Derived struct visitors also accept arrays; only objects carry named fields
    if !value.is_object() {
        warn!("Rejected non-object request body");
        return Err(ApiError::InvalidBody);
    }

    let request: CreateMessageRequest = serde_json::from_value(value).map_err(|e| {
        warn!("Rejected request body: {}", e);
        ApiError::InvalidBody
    })?;

    if let Err(e) = request.validate() {
        warn!("Rejected message: {}", e);
        return Err(ApiError::MissingFields);
    }

    match service
        .add_message(request.name.as_deref(), request.message.as_deref())
        .await
    {
        Ok(data) => {
            info!("Message {} added", data.id);
            Ok((
                StatusCode::CREATED,
                Json(CreateMessageResponse {
                    message: "Message added successfully".to_string(),
                    data,
                }),
            ))
        }
        Err(LettersError::Validation { message }) => {
            warn!("Rejected message: {}", message);
            Err(ApiError::MissingFields)
        }
        Err(e) => {
            error!("Failed to save message: {}", e);
            Err(ApiError::SaveFailed)
        }
    }
}
