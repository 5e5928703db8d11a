// models/messagemodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    pub id: String,
    pub sender_id: String,
    #[serde(default)]
    pub sender_name: String,
    pub receiver_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_name: Option<String>,
    #[serde(default)]
    pub subject: String,
    pub content: String,
    #[serde(rename = "timestamp")]
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

impl DirectMessage {
    pub fn involves(&self, user_id: &str) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }

    /// The other party of this message, seen from `user_id`.
    pub fn counterpart_of(&self, user_id: &str) -> &str {
        if self.sender_id == user_id {
            &self.receiver_id
        } else {
            &self.sender_id
        }
    }

    pub fn is_unread_for(&self, user_id: &str) -> bool {
        !self.is_read && self.receiver_id == user_id
    }
}

/// Messages between one user and one counterpart. Derived on every read, never stored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub contact_id: String,
    pub contact_name: String,
    pub contact_avatar: String,
    pub last_message: String,
    pub last_timestamp: DateTime<Utc>,
    pub unread_count: u32,
    pub messages: Vec<DirectMessage>,
}
