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

//! Change notifications for stored letters
//!
//! Stores publish one [`MessageEvent`] per successful write. Nothing in the
//! request path consumes these; they exist for live-update consumers.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

use crate::messages::Message;

const DEFAULT_CAPACITY: usize = 64;

/// A write that happened on the messages table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "record", rename_all = "UPPERCASE")]
pub enum MessageEvent {
    Inserted(Message),
    Updated(Message),
    Deleted(Message),
}

impl MessageEvent {
    pub fn message(&self) -> &Message {
        match self {
            MessageEvent::Inserted(m) | MessageEvent::Updated(m) | MessageEvent::Deleted(m) => m,
        }
    }
}

/// Fan-out port for [`MessageEvent`]s
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<MessageEvent>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MessageEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Having no subscribers is fine.
    pub fn publish(&self, event: MessageEvent) {
        match self.sender.send(event) {
            Ok(receivers) => trace!("Published message event to {} subscribers", receivers),
            Err(_) => trace!("No subscribers for message event"),
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
