// db/messagedb.rs
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Error;

use super::DBClient;
use crate::{
    dtos::messagedtos::SendMessageDto, models::messagemodel::DirectMessage,
    utils::id_generator::generate_message_id,
};

#[async_trait]
pub trait MessageExt {
    async fn get_user_messages(&self, user_id: &str) -> Result<Vec<DirectMessage>, Error>;

    async fn create_message(
        &self,
        dto: &SendMessageDto,
        sender_name: &str,
    ) -> Result<DirectMessage, Error>;

    async fn mark_messages_as_read(&self, user_id: &str, contact_id: &str) -> Result<u64, Error>;
}

#[async_trait]
impl MessageExt for DBClient {
    async fn get_user_messages(&self, user_id: &str) -> Result<Vec<DirectMessage>, Error> {
        sqlx::query_as::<_, DirectMessage>(concat!(
            "SELECT ",
            message_columns!(),
            " FROM messages WHERE sender_id = $1 OR receiver_id = $1 ORDER BY sent_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_message(
        &self,
        dto: &SendMessageDto,
        sender_name: &str,
    ) -> Result<DirectMessage, Error> {
        let id = dto.id.clone().unwrap_or_else(generate_message_id);
        let sent_at = dto.timestamp.unwrap_or_else(Utc::now);

        sqlx::query_as::<_, DirectMessage>(concat!(
            r#"
            INSERT INTO messages
                (id, sender_id, sender_name, receiver_id, ca_profile_id, ca_name, subject, content, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING "#,
            message_columns!()
        ))
        .bind(&id)
        .bind(&dto.sender_id)
        .bind(sender_name)
        .bind(&dto.receiver_id)
        .bind(dto.ca_profile_id.as_deref())
        .bind(dto.ca_name.as_deref())
        .bind(dto.subject.clone().unwrap_or_default())
        .bind(&dto.content)
        .bind(sent_at)
        .fetch_one(&self.pool)
        .await
    }

    async fn mark_messages_as_read(&self, user_id: &str, contact_id: &str) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE receiver_id = $1 AND sender_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(user_id)
        .bind(contact_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
