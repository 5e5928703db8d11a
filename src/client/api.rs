// client/api.rs
use async_trait::async_trait;
use thiserror::Error;

use crate::{
    dtos::{
        messagedtos::{MarkReadDto, SendMessageDto},
        profiledtos::{ReviewProfileDto, UpdateProfileDto, UpsertProfileDto},
        userdtos::{UpdateUserDto, UpsertUserDto, VerifyEmailResponseDto},
    },
    models::{
        messagemodel::DirectMessage,
        profilemodel::{CaProfile, NearbyProfile},
        reviewmodel::Review,
        usermodel::User,
    },
    service::discovery::{Coordinates, SearchCriteria},
};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API responded with {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{0} not found")]
    NotFound(String),
}

/// REST surface of the marketplace as seen by a client.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    async fn get_users(&self, email: Option<&str>) -> Result<Vec<User>, ClientError>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, ClientError>;

    async fn save_user(&self, user: &UpsertUserDto) -> Result<User, ClientError>;

    async fn update_user(&self, user_id: &str, patch: &UpdateUserDto) -> Result<User, ClientError>;

    async fn verify_email(
        &self,
        user_id: &str,
        profile_id: Option<&str>,
    ) -> Result<VerifyEmailResponseDto, ClientError>;

    async fn get_profiles(&self, user_id: Option<&str>) -> Result<Vec<CaProfile>, ClientError>;

    async fn get_profile(&self, profile_id: &str) -> Result<Option<CaProfile>, ClientError>;

    async fn save_profile(&self, profile: &UpsertProfileDto) -> Result<CaProfile, ClientError>;

    async fn update_profile(
        &self,
        profile_id: &str,
        patch: &UpdateProfileDto,
    ) -> Result<CaProfile, ClientError>;

    async fn review_profile(
        &self,
        profile_id: &str,
        review: &ReviewProfileDto,
    ) -> Result<CaProfile, ClientError>;

    async fn search_profiles(&self, criteria: &SearchCriteria) -> Result<Vec<CaProfile>, ClientError>;

    async fn get_messages(&self, user_id: &str) -> Result<Vec<DirectMessage>, ClientError>;

    async fn send_message(&self, message: &SendMessageDto) -> Result<DirectMessage, ClientError>;

    async fn mark_messages_read(&self, request: &MarkReadDto) -> Result<u64, ClientError>;

    async fn get_reviews(&self, ca_id: &str) -> Result<Vec<Review>, ClientError>;

    async fn get_nearby(&self, origin: Coordinates) -> Result<Vec<NearbyProfile>, ClientError>;
}
