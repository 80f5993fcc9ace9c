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

use thiserror::Error;

use crate::store::StoreError;

/// Base error type for Letters Core operations
#[derive(Debug, Error)]
pub enum LettersError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl LettersError {
    pub fn validation(message: impl Into<String>) -> Self {
        LettersError::Validation {
            message: message.into(),
        }
    }

    /// True when the error was caused by caller input rather than the backend
    pub fn is_validation(&self) -> bool {
        matches!(self, LettersError::Validation { .. })
    }
}

/// Result type alias for Letters operations
pub type LettersResult<T> = Result<T, LettersError>;
