use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::dto::ErrorResponse;

/// Errors returned to HTTP clients.
///
/// The display text of each variant is the public `error` string.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Name and message are required")]
    MissingFields,

    #[error("Invalid request body")]
    InvalidBody,

    #[error("Failed to fetch messages")]
    FetchFailed,

    #[error("Failed to save message")]
    SaveFailed,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::InvalidBody => StatusCode::BAD_REQUEST,
            ApiError::FetchFailed | ApiError::SaveFailed | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
