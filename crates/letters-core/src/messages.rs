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

//! The letter record and its creation draft

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{LettersError, LettersResult};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Name and message are required";

/// A stored letter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    /// Display name of the intended recipient
    pub name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Case-insensitive, unanchored substring match against `name`.
    ///
    /// An empty filter matches everything.
    pub fn name_matches(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&filter.to_lowercase())
    }
}

/// A letter that passed validation but has not been stored yet.
///
/// Fields are private so a draft can only be built through [`NewMessage::new`],
/// which guarantees both are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    name: String,
    message: String,
}

impl NewMessage {
    pub fn new(name: Option<&str>, message: Option<&str>) -> LettersResult<Self> {
        let name = name.map(str::trim).unwrap_or_default();
        let message = message.map(str::trim).unwrap_or_default();

        if name.is_empty() || message.is_empty() {
            return Err(LettersError::validation(REQUIRED_FIELDS_MESSAGE));
        }

        Ok(Self {
            name: name.to_string(),
            message: message.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Turn the draft into a stored record
    pub fn into_message(self, id: i64, timestamp: DateTime<Utc>) -> Message {
        Message {
            id,
            name: self.name,
            message: self.message,
            timestamp,
        }
    }
}
