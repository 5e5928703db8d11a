use chrono::prelude::*;
use serde::{Deserialize, Serialize};

/// Seeded super-administrator account.
pub const ADMIN_USER_ID: &str = "admin-001";
pub const ADMIN_NAME: &str = "Super Admin";
pub const ADMIN_PHONE: &str = "0000000000";
pub const ADMIN_AVATAR_SEED: &str = "AdminManish";

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    Client,
    Ca,
    Accountant,
    Admin,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Client => "CLIENT",
            UserRole::Ca => "CA",
            UserRole::Accountant => "ACCOUNTANT",
            UserRole::Admin => "ADMIN",
        }
    }

    /// CA and accountant accounts own a professional profile.
    pub fn is_professional(&self) -> bool {
        matches!(self, UserRole::Ca | UserRole::Accountant)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "admin_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AdminRole {
    Super,
    Support,
    Verification,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_role: Option<AdminRole>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub bookmarks: Vec<String>,
    #[serde(default)]
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_bookmarked(&self, profile_id: &str) -> bool {
        self.bookmarks.iter().any(|id| id == profile_id)
    }
}
