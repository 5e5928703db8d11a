// client/storage.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use super::api::{ClientError, MarketplaceApi};
use crate::{
    config::DEFAULT_ADMIN_EMAIL,
    dtos::{
        messagedtos::{MarkReadDto, MarkReadResponseDto, SendMessageDto},
        profiledtos::{ReviewProfileDto, UpdateProfileDto, UpsertProfileDto},
        userdtos::{UpdateUserDto, UpsertUserDto, VerifyEmailDto, VerifyEmailResponseDto},
    },
    error::ErrorResponse,
    models::{
        messagemodel::{Conversation, DirectMessage},
        profilemodel::{CaProfile, NearbyProfile},
        reviewmodel::Review,
        usermodel::User,
    },
    service::{
        conversation::aggregate_conversations,
        discovery::{Coordinates, FeaturedProfiles, SearchCriteria},
    },
};

const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub admin_email: String,
    pub admin_password: Option<String>,
    /// No timeout unless configured.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_API_URL.to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let defaults = ClientConfig::default();

        ClientConfig {
            base_url: std::env::var("TAXMITRA_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            admin_email: std::env::var("ADMIN_EMAIL")
                .map(|email| email.to_lowercase())
                .unwrap_or(defaults.admin_email),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
            timeout: std::env::var("TAXMITRA_API_TIMEOUT_SECS")
                .ok()
                .and_then(|secs| secs.trim().parse::<u64>().ok())
                .map(Duration::from_secs),
        }
    }
}

/// reqwest-backed client for the marketplace REST API.
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
}

impl StorageClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(StorageClient {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        Self::read(response).await
    }

    /// Like `fetch`, mapping a 404 to `None`.
    async fn fetch_optional<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, ClientError> {
        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::read(response).await.map(Some)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(self.request(method, path).json(body)).await
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|err| err.message)
            .unwrap_or(text);
        tracing::warn!("API call failed with {}: {}", status, message);

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl MarketplaceApi for StorageClient {
    async fn get_users(&self, email: Option<&str>) -> Result<Vec<User>, ClientError> {
        let mut request = self.request(Method::GET, "/users");
        if let Some(email) = email {
            request = request.query(&[("email", email)]);
        }
        self.fetch(request).await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, ClientError> {
        self.fetch_optional(self.request(Method::GET, &format!("/users/{}", user_id)))
            .await
    }

    async fn save_user(&self, user: &UpsertUserDto) -> Result<User, ClientError> {
        self.send_json(Method::POST, "/users", user).await
    }

    async fn update_user(&self, user_id: &str, patch: &UpdateUserDto) -> Result<User, ClientError> {
        self.send_json(Method::PATCH, &format!("/users/{}", user_id), patch)
            .await
    }

    async fn verify_email(
        &self,
        user_id: &str,
        profile_id: Option<&str>,
    ) -> Result<VerifyEmailResponseDto, ClientError> {
        let body = VerifyEmailDto {
            profile_id: profile_id.map(str::to_string),
        };
        self.send_json(Method::POST, &format!("/users/{}/verify-email", user_id), &body)
            .await
    }

    async fn get_profiles(&self, user_id: Option<&str>) -> Result<Vec<CaProfile>, ClientError> {
        let mut request = self.request(Method::GET, "/profiles");
        if let Some(user_id) = user_id {
            request = request.query(&[("userId", user_id)]);
        }
        self.fetch(request).await
    }

    async fn get_profile(&self, profile_id: &str) -> Result<Option<CaProfile>, ClientError> {
        self.fetch_optional(self.request(Method::GET, &format!("/profiles/{}", profile_id)))
            .await
    }

    async fn save_profile(&self, profile: &UpsertProfileDto) -> Result<CaProfile, ClientError> {
        self.send_json(Method::POST, "/profiles", profile).await
    }

    async fn update_profile(
        &self,
        profile_id: &str,
        patch: &UpdateProfileDto,
    ) -> Result<CaProfile, ClientError> {
        self.send_json(Method::PATCH, &format!("/profiles/{}", profile_id), patch)
            .await
    }

    async fn review_profile(
        &self,
        profile_id: &str,
        review: &ReviewProfileDto,
    ) -> Result<CaProfile, ClientError> {
        self.send_json(Method::POST, &format!("/profiles/{}/review", profile_id), review)
            .await
    }

    async fn search_profiles(&self, criteria: &SearchCriteria) -> Result<Vec<CaProfile>, ClientError> {
        self.fetch(self.request(Method::GET, "/profiles/search").query(criteria))
            .await
    }

    async fn get_messages(&self, user_id: &str) -> Result<Vec<DirectMessage>, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/messages/{}", user_id)))
            .await
    }

    async fn send_message(&self, message: &SendMessageDto) -> Result<DirectMessage, ClientError> {
        self.send_json(Method::POST, "/messages", message).await
    }

    async fn mark_messages_read(&self, request: &MarkReadDto) -> Result<u64, ClientError> {
        let response: MarkReadResponseDto = self
            .send_json(Method::PATCH, "/messages/read", request)
            .await?;
        Ok(response.updated)
    }

    async fn get_reviews(&self, ca_id: &str) -> Result<Vec<Review>, ClientError> {
        self.fetch(self.request(Method::GET, &format!("/reviews/{}", ca_id)))
            .await
    }

    async fn get_nearby(&self, origin: Coordinates) -> Result<Vec<NearbyProfile>, ClientError> {
        let query = [
            ("lat", origin.latitude.to_string()),
            ("lon", origin.longitude.to_string()),
        ];
        self.fetch(self.request(Method::GET, "/nearby").query(&query))
            .await
    }
}

/// Conversations computed locally from the flat message list and the user directory.
pub async fn get_conversations<A>(api: &A, user_id: &str) -> Result<Vec<Conversation>, ClientError>
where
    A: MarketplaceApi + ?Sized,
{
    let messages = api.get_messages(user_id).await?;
    let directory = api.get_users(None).await?;

    Ok(aggregate_conversations(&messages, &directory, user_id))
}

/// Flips the profile's online flag. Read then write, so concurrent toggles can be lost.
pub async fn toggle_online_status<A>(api: &A, profile_id: &str) -> Result<CaProfile, ClientError>
where
    A: MarketplaceApi + ?Sized,
{
    let profile = api
        .get_profile(profile_id)
        .await?
        .ok_or_else(|| ClientError::NotFound(format!("Profile {}", profile_id)))?;

    api.update_profile(profile_id, &UpdateProfileDto::online(!profile.is_online))
        .await
}

/// Landing page selection: nearby professionals, else the best rated.
/// A missing location (denied geolocation) goes straight to the fallback.
pub async fn featured_profiles<A>(
    api: &A,
    origin: Option<Coordinates>,
    limit: usize,
) -> Result<FeaturedProfiles, ClientError>
where
    A: MarketplaceApi + ?Sized,
{
    if let Some(origin) = origin {
        let nearby = api.get_nearby(origin).await?;
        if let Some(featured) = FeaturedProfiles::from_nearby(nearby, limit) {
            return Ok(featured);
        }
    }

    let verified = api.search_profiles(&SearchCriteria::default()).await?;
    Ok(FeaturedProfiles::top_rated(verified, limit))
}
