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

//! PostgREST store implementation
//!
//! Talks to the REST interface a hosted Supabase project exposes at
//! `{url}/rest/v1/{table}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, error};

use super::config::{ListOrder, StoreConfig};
use super::traits::MessageStore;
use super::types::{StoreError, StoreResult};
use crate::messages::{Message, NewMessage};
use crate::notify::{ChangeNotifier, MessageEvent};

const REST_PATH: &str = "rest/v1";
const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    name: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateRow<'a> {
    message: &'a str,
}

/// Escape LIKE metacharacters so the filter matches literally
pub(crate) fn escape_like(filter: &str) -> String {
    let mut escaped = String::with_capacity(filter.len());
    for c in filter.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn order_param(order: ListOrder) -> &'static str {
    match order {
        ListOrder::NewestFirst => "timestamp.desc",
        ListOrder::InsertionOrder => "timestamp.asc",
    }
}

/// Message store backed by a PostgREST endpoint
#[derive(Debug)]
pub struct PostgrestStore {
    client: Client,
    table_url: String,
    order: ListOrder,
    notifier: ChangeNotifier,
}

impl PostgrestStore {
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let url = config
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| StoreError::Config("PostgREST url is required".to_string()))?;
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| StoreError::Config("PostgREST api key is required".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(api_key)?);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", api_key))?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            table_url: format!("{}/{}/{}", url.trim_end_matches('/'), REST_PATH, config.table),
            order: config.effective_order(),
            notifier: ChangeNotifier::default(),
        })
    }

    /// Turn non-success responses into [`StoreError::Backend`]
    async fn check_status(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("PostgREST returned {}: {}", status, body);
        Err(StoreError::Backend {
            status: status.as_u16(),
            body,
        })
    }

    /// Writes return the affected rows; take the single one we asked for
    async fn single_row(response: Response, id: Option<i64>) -> StoreResult<Message> {
        let rows: Vec<Message> = Self::check_status(response).await?.json().await?;
        match (rows.into_iter().next(), id) {
            (Some(row), _) => Ok(row),
            (None, Some(id)) => Err(StoreError::NotFound(id)),
            (None, None) => Err(StoreError::Serialization(
                "PostgREST returned no rows for insert".to_string(),
            )),
        }
    }
}

fn header_value(value: &str) -> StoreResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| StoreError::Config(format!("Invalid header value: {}", e)))
}

#[async_trait]
impl MessageStore for PostgrestStore {
    async fn list(&self, name_filter: Option<&str>) -> StoreResult<Vec<Message>> {
        let mut request = self
            .client
            .get(&self.table_url)
            .query(&[("select", "*"), ("order", order_param(self.order))]);

        if let Some(filter) = name_filter.filter(|f| !f.is_empty()) {
            request = request.query(&[("name", format!("ilike.%{}%", escape_like(filter)))]);
        }

        let response = Self::check_status(request.send().await?).await?;
        let messages: Vec<Message> = response.json().await?;
        debug!("Fetched {} messages", messages.len());
        Ok(messages)
    }

    async fn create(&self, draft: NewMessage) -> StoreResult<Message> {
        let rows = [InsertRow {
            name: draft.name(),
            message: draft.message(),
        }];

        let response = self
            .client
            .post(&self.table_url)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&rows)
            .send()
            .await?;

        let message = Self::single_row(response, None).await?;
        debug!("Inserted message {}", message.id);
        self.notifier.publish(MessageEvent::Inserted(message.clone()));
        Ok(message)
    }

    async fn update(&self, id: i64, message: &str) -> StoreResult<Message> {
        let body = message.trim();
        if body.is_empty() {
            return Err(StoreError::InvalidParameter("message must not be empty".to_string()));
        }

        let response = self
            .client
            .patch(&self.table_url)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&UpdateRow { message: body })
            .send()
            .await?;

        let updated = Self::single_row(response, Some(id)).await?;
        self.notifier.publish(MessageEvent::Updated(updated.clone()));
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> StoreResult<Message> {
        let response = self
            .client
            .delete(&self.table_url)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", RETURN_REPRESENTATION)
            .send()
            .await?;

        let removed = Self::single_row(response, Some(id)).await?;
        self.notifier.publish(MessageEvent::Deleted(removed.clone()));
        Ok(removed)
    }

    async fn health_check(&self) -> StoreResult<bool> {
        let response = self
            .client
            .get(&self.table_url)
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    fn subscribe(&self) -> broadcast::Receiver<MessageEvent> {
        self.notifier.subscribe()
    }

    fn order(&self) -> ListOrder {
        self.order
    }
}
