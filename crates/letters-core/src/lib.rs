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

//! # Letters Core
//!
//! Storage layer for the Unsent Letters board.
//!
//! This crate provides the message model, its validation rules, and the
//! storage backends (PostgREST and in-memory) behind a single async trait.

pub mod errors;
pub mod messages;
pub mod notify;
pub mod store;

// Re-export commonly used types
pub use errors::{LettersError, LettersResult};
pub use messages::{Message, NewMessage};
pub use notify::{ChangeNotifier, MessageEvent};

// Re-export the store abstraction
pub use store::{
    create_store, ListOrder, MemoryStore, MessageStore, PostgrestStore, StoreConfig, StoreError,
    StoreResult, StoreType,
};
