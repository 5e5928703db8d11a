// db/reviewdb.rs
use async_trait::async_trait;
use sqlx::Error;

use super::DBClient;
use crate::models::reviewmodel::Review;

#[async_trait]
pub trait ReviewExt {
    async fn get_reviews_for_profile(&self, ca_id: &str) -> Result<Vec<Review>, Error>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn get_reviews_for_profile(&self, ca_id: &str) -> Result<Vec<Review>, Error> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT id, ca_id, client_id, client_name, rating, comment, created_at
            FROM reviews
            WHERE ca_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(ca_id)
        .fetch_all(&self.pool)
        .await
    }
}
