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

//! In-memory store implementation
//!
//! Messages live for the lifetime of the process. Ids are millisecond
//! timestamps, bumped forward when two writes land in the same millisecond.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::config::ListOrder;
use super::traits::MessageStore;
use super::types::{StoreError, StoreResult};
use crate::messages::{Message, NewMessage};
use crate::notify::{ChangeNotifier, MessageEvent};

#[derive(Debug, Default)]
struct Inner {
    /// Kept in insertion order
    messages: Vec<Message>,
    last_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        let id = Utc::now().timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        id
    }

    fn position(&self, id: i64) -> StoreResult<usize> {
        self.messages
            .iter()
            .position(|m| m.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

/// Process-local message store
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    order: ListOrder,
    notifier: ChangeNotifier,
}

impl MemoryStore {
    pub fn new(order: ListOrder) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            order,
            notifier: ChangeNotifier::default(),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.messages.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(ListOrder::InsertionOrder)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn list(&self, name_filter: Option<&str>) -> StoreResult<Vec<Message>> {
        let filter = name_filter.unwrap_or_default();
        let inner = self.inner.read().await;

        let mut messages: Vec<Message> = inner
            .messages
            .iter()
            .filter(|m| m.name_matches(filter))
            .cloned()
            .collect();

        if self.order == ListOrder::NewestFirst {
            messages.reverse();
        }

        Ok(messages)
    }

    async fn create(&self, draft: NewMessage) -> StoreResult<Message> {
        let message = {
            let mut inner = self.inner.write().await;
            let id = inner.next_id();
            let message = draft.into_message(id, Utc::now());
            inner.messages.push(message.clone());
            message
        };

        debug!("Stored message {} in memory", message.id);
        self.notifier.publish(MessageEvent::Inserted(message.clone()));
        Ok(message)
    }

    async fn update(&self, id: i64, message: &str) -> StoreResult<Message> {
        let body = message.trim();
        if body.is_empty() {
            return Err(StoreError::InvalidParameter("message must not be empty".to_string()));
        }

        let updated = {
            let mut inner = self.inner.write().await;
            let pos = inner.position(id)?;
            let record = &mut inner.messages[pos];
            record.message = body.to_string();
            record.clone()
        };

        self.notifier.publish(MessageEvent::Updated(updated.clone()));
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> StoreResult<Message> {
        let removed = {
            let mut inner = self.inner.write().await;
            let pos = inner.position(id)?;
            inner.messages.remove(pos)
        };

        self.notifier.publish(MessageEvent::Deleted(removed.clone()));
        Ok(removed)
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }

    fn subscribe(&self) -> broadcast::Receiver<MessageEvent> {
        self.notifier.subscribe()
    }

    fn order(&self) -> ListOrder {
        self.order
    }
}
