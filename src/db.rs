// db.rs
macro_rules! user_columns {
    () => {
        "id, name, email, phone, role, admin_role, avatar, bookmarks, is_email_verified, created_at, updated_at"
    };
}

macro_rules! profile_columns {
    () => {
        "id, user_id, professional_type, name, firm_name, icai_registration_number, \
         professional_qualification, experience_years, rating, review_count, specializations, \
         languages, about, services, pricing_range, avatar, city, state, pincode, latitude, \
         longitude, is_verified, is_online, verification_status, admin_feedback, created_at, updated_at"
    };
}

macro_rules! message_columns {
    () => {
        "id, sender_id, sender_name, receiver_id, ca_profile_id, ca_name, subject, content, sent_at, is_read"
    };
}

pub mod messagedb;
pub mod profiledb;
pub mod reviewdb;
pub mod userdb;

use sqlx::{Pool, Postgres};

#[derive(Debug, Clone)]
pub struct DBClient {
    pool: Pool<Postgres>,
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Result of a create-or-replace write.
#[derive(Debug, Clone, PartialEq)]
pub enum Upsert<T> {
    Created(T),
    Replaced(T),
}

impl<T> Upsert<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Upsert::Created(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Upsert::Created(value) | Upsert::Replaced(value) => value,
        }
    }
}
