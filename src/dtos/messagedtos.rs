use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(length(min = 1, message = "Sender is required"))]
    pub sender_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,

    #[validate(length(min = 1, message = "Receiver is required"))]
    pub receiver_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_profile_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_name: Option<String>,

    #[validate(length(max = 200, message = "Subject must be at most 200 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Message must be between 1-5000 characters"))]
    pub content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadDto {
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,

    #[validate(length(min = 1, message = "Contact id is required"))]
    pub contact_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadResponseDto {
    pub success: bool,
    pub updated: u64,
}
