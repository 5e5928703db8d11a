use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub ca_id: String,
    pub client_id: String,
    pub client_name: String,
    pub rating: i16,
    pub comment: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}
