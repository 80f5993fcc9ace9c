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

//! Store configuration types

use serde::{Deserialize, Serialize};

pub const DEFAULT_TABLE: &str = "messages";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Supported store backends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StoreType {
    Memory,
    Postgrest,
}

impl StoreType {
    /// Default listing order for this backend
    pub fn default_order(&self) -> ListOrder {
        match self {
            StoreType::Memory => ListOrder::InsertionOrder,
            StoreType::Postgrest => ListOrder::NewestFirst,
        }
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::Memory => write!(f, "memory"),
            StoreType::Postgrest => write!(f, "postgrest"),
        }
    }
}

impl std::str::FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreType::Memory),
            "postgrest" | "supabase" => Ok(StoreType::Postgrest),
            _ => Err(format!("Unknown store backend: {}", s)),
        }
    }
}

/// Order in which `list` returns messages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ListOrder {
    /// Descending by timestamp
    NewestFirst,
    /// Ascending by timestamp, i.e. the order messages were added
    InsertionOrder,
}

impl std::fmt::Display for ListOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListOrder::NewestFirst => write!(f, "newest-first"),
            ListOrder::InsertionOrder => write!(f, "insertion"),
        }
    }
}

impl std::str::FromStr for ListOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest-first" | "newest" | "desc" => Ok(ListOrder::NewestFirst),
            "insertion" | "oldest-first" | "oldest" | "asc" => Ok(ListOrder::InsertionOrder),
            _ => Err(format!("Unknown list order: {}", s)),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub store_type: StoreType,
    /// Base URL of the PostgREST service, e.g. `https://xyz.supabase.co`
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub table: String,
    pub timeout_seconds: u64,
    /// Falls back to [`StoreType::default_order`] when unset
    pub order: Option<ListOrder>,
}

impl StoreConfig {
    /// Create an in-memory configuration
    pub fn memory() -> Self {
        Self {
            store_type: StoreType::Memory,
            url: None,
            api_key: None,
            table: DEFAULT_TABLE.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            order: None,
        }
    }

    /// Create a PostgREST configuration
    pub fn postgrest(url: String, api_key: String) -> Self {
        Self {
            store_type: StoreType::Postgrest,
            url: Some(url),
            api_key: Some(api_key),
            ..Self::memory()
        }
    }

    /// Set the table name
    pub fn with_table(mut self, table: String) -> Self {
        self.table = table;
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Override the listing order
    pub fn with_order(mut self, order: ListOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// The listing order this store will use
    pub fn effective_order(&self) -> ListOrder {
        self.order.unwrap_or_else(|| self.store_type.default_order())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::memory()
    }
}
