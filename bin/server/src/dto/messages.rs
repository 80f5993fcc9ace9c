use letters_core::Message;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query parameters for listing messages
#[derive(Debug, Default, Deserialize)]
pub struct ListMessagesQuery {
    /// Recipient name filter, passed to the store as-is
    pub name: Option<String>,
}

/// Messages found by a list or search
#[derive(Debug, Serialize, Deserialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<Message>,
}

/// Request to add a message.
///
/// Both fields are optional at the JSON level so that a missing field is a
/// validation failure rather than a parse failure.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, length(min = 1))]
    pub message: Option<String>,
}

/// Response for a stored message
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMessageResponse {
    pub message: String,
    pub data: Message,
}
