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

//! Store abstraction traits

use std::fmt::Debug;

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::config::ListOrder;
use super::types::StoreResult;
use crate::messages::{Message, NewMessage};
use crate::notify::MessageEvent;

/// Main store trait that abstracts message persistence
#[async_trait]
pub trait MessageStore: Send + Sync + Debug {
    /// List messages, optionally filtered by a case-insensitive substring of `name`.
    ///
    /// `None` and `Some("")` both mean no filter. Results come back in
    /// [`MessageStore::order`].
    async fn list(&self, name_filter: Option<&str>) -> StoreResult<Vec<Message>>;

    /// Store a validated draft, assigning `id` and `timestamp`
    async fn create(&self, draft: NewMessage) -> StoreResult<Message>;

    /// Replace the body of an existing message. Not reachable over HTTP.
    async fn update(&self, id: i64, message: &str) -> StoreResult<Message>;

    /// Remove a message, returning the removed record. Not reachable over HTTP.
    async fn delete(&self, id: i64) -> StoreResult<Message>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> StoreResult<bool>;

    /// Subscribe to write events on this store
    fn subscribe(&self) -> broadcast::Receiver<MessageEvent>;

    /// Listing order of this store
    fn order(&self) -> ListOrder;
}
