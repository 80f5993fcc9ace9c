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

//! Storage abstraction layer for letters
//!
//! This module provides a backend-agnostic interface for message persistence.
//! It supports a PostgREST backend (hosted Postgres) and a process-local one.

use std::sync::Arc;

use tracing::info;

pub mod config;
pub mod memory;
pub mod postgrest;
pub mod traits;
pub mod types;

pub use config::{ListOrder, StoreConfig, StoreType};
pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;
pub use traits::MessageStore;
pub use types::{StoreError, StoreResult};

/// Factory function to create a store instance based on configuration
pub fn create_store(config: StoreConfig) -> StoreResult<Arc<dyn MessageStore>> {
    info!(
        "Creating {} store with {} ordering",
        config.store_type,
        config.effective_order()
    );

    match config.store_type {
        StoreType::Memory => Ok(Arc::new(MemoryStore::new(config.effective_order()))),
        StoreType::Postgrest => Ok(Arc::new(PostgrestStore::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_store_picks_backend_order() {
        let store = create_store(StoreConfig::memory()).unwrap();
        assert_eq!(store.order(), ListOrder::InsertionOrder);

        let store = create_store(
            StoreConfig::postgrest("http://localhost:54321".into(), "key".into()),
        )
        .unwrap();
        assert_eq!(store.order(), ListOrder::NewestFirst);
    }

    #[test]
    fn test_create_store_rejects_incomplete_postgrest_config() {
        let mut config = StoreConfig::memory();
        config.store_type = StoreType::Postgrest;
        assert!(matches!(create_store(config), Err(StoreError::Config(_))));
    }
}
