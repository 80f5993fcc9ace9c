/*
Copyright 2024, Zep Software, Inc.

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Store error types and result aliases

use thiserror::Error;

/// Store-specific errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend could not be reached (connect failure, timeout)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with a non-success status
    #[error("Backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Message {0} not found")]
    NotFound(i64),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Serialization(err.to_string())
        } else if let Some(status) = err.status() {
            StoreError::Backend {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            StoreError::Unavailable(err.to_string())
        }
    }
}
