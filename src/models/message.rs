use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::utils::contains_ignore_case;

const MAX_MESSAGE_LENGTH: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, deserialize_with = "crate::utils::opaque_id")]
    pub id: String,
    pub sender_user_name: String,
    pub receiver_user_name: String,
    pub text: String,
    #[serde(
        default,
        deserialize_with = "crate::utils::lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_user_name: String,
    pub text: String,
}

impl SendMessageRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.receiver_user_name.trim().is_empty() {
            return Err(AppError::validation("receiver is required"));
        }
        let len = self.text.trim().chars().count();
        if len == 0 {
            return Err(AppError::validation("message cannot be empty"));
        }
        if len > MAX_MESSAGE_LENGTH {
            return Err(AppError::validation(format!(
                "message must not exceed {MAX_MESSAGE_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MessageStats {
    pub sent: usize,
    pub received: usize,
    pub total: usize,
}

impl MessageStats {
    pub fn for_user(messages: &[Message], user_name: &str) -> Self {
        Self {
            sent: messages.iter().filter(|m| m.sender_user_name == user_name).count(),
            received: messages.iter().filter(|m| m.receiver_user_name == user_name).count(),
            total: messages.len(),
        }
    }
}

/// Case-insensitive match on text, sender or receiver.
pub fn search_messages<'a>(messages: &'a [Message], term: &str) -> Vec<&'a Message> {
    messages
        .iter()
        .filter(|m| {
            contains_ignore_case(&m.text, term)
                || contains_ignore_case(&m.sender_user_name, term)
                || contains_ignore_case(&m.receiver_user_name, term)
        })
        .collect()
}
