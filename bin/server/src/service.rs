use std::sync::Arc;

use letters_core::{
    LettersResult, Message, MessageEvent, MessageStore, NewMessage, StoreConfig,
};
use tokio::sync::broadcast;

use crate::config::{DisplayMode, Settings};

/// Service layer that owns the message store and provides high-level operations
#[derive(Debug)]
pub struct LettersService {
    store: Arc<dyn MessageStore>,
    display_mode: DisplayMode,
}

impl LettersService {
    /// Create a new LettersService from settings
    pub fn new(settings: &Settings) -> LettersResult<Self> {
        Self::from_config(settings.store_config(), settings.display_mode)
    }

    pub fn from_config(config: StoreConfig, display_mode: DisplayMode) -> LettersResult<Self> {
        let store = letters_core::create_store(config)?;
        Ok(Self::with_store(store, display_mode))
    }

    /// Wrap an already constructed store
    pub fn with_store(store: Arc<dyn MessageStore>, display_mode: DisplayMode) -> Self {
        Self {
            store,
            display_mode,
        }
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// List messages, optionally filtered by recipient name
    pub async fn list_messages(&self, name: Option<&str>) -> LettersResult<Vec<Message>> {
        Ok(self.store.list(name).await?)
    }

    /// Validate, trim and store a new message
    pub async fn add_message(
        &self,
        name: Option<&str>,
        message: Option<&str>,
    ) -> LettersResult<Message> {
        let draft = NewMessage::new(name, message)?;
        Ok(self.store.create(draft).await?)
    }

    pub async fn is_healthy(&self) -> bool {
        self.store.health_check().await.unwrap_or(false)
    }

    /// Live feed of store writes
    pub fn subscribe(&self) -> broadcast::Receiver<MessageEvent> {
        self.store.subscribe()
    }
}
