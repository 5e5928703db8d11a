// client/fake.rs
//! In-memory `MarketplaceApi` for client tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::api::{ClientError, MarketplaceApi};
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
    service::{
        contact,
        discovery::{self, Coordinates, SearchCriteria},
        verification,
    },
    testing,
    utils::id_generator::{generate_message_id, generate_user_id},
};

const RADIUS_KM: f64 = 100.0;

#[derive(Default)]
struct Store {
    users: Vec<User>,
    profiles: Vec<CaProfile>,
    messages: Vec<DirectMessage>,
    reviews: Vec<Review>,
}

#[derive(Default)]
pub struct FakeApi {
    store: Mutex<Store>,
}

impl FakeApi {
    pub fn add_user(&self, user: User) {
        self.store.lock().unwrap().users.push(user);
    }

    pub fn add_profile(&self, profile: CaProfile) {
        self.store.lock().unwrap().profiles.push(profile);
    }

    pub fn add_message(&self, message: DirectMessage) {
        self.store.lock().unwrap().messages.push(message);
    }

    pub fn users(&self) -> Vec<User> {
        self.store.lock().unwrap().users.clone()
    }

    fn not_found(what: &str, id: &str) -> ClientError {
        ClientError::NotFound(format!("{} {}", what, id))
    }

    fn rejected(status: u16, message: impl ToString) -> ClientError {
        ClientError::Api {
            status,
            message: message.to_string(),
        }
    }
}

fn haversine_km(a: Coordinates, b: &CaProfile) -> f64 {
    let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * 6371.0088 * h.sqrt().min(1.0).asin()
}

#[async_trait]
impl MarketplaceApi for FakeApi {
    async fn get_users(&self, email: Option<&str>) -> Result<Vec<User>, ClientError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .users
            .iter()
            .filter(|user| email.map_or(true, |e| user.email.eq_ignore_ascii_case(e)))
            .cloned()
            .collect())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, ClientError> {
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().find(|user| user.id == user_id).cloned())
    }

    async fn save_user(&self, dto: &UpsertUserDto) -> Result<User, ClientError> {
        let mut store = self.store.lock().unwrap();
        let position = store.users.iter().position(|user| {
            dto.id.as_deref() == Some(user.id.as_str()) || user.email.eq_ignore_ascii_case(&dto.email)
        });

        let mut user = match position {
            Some(index) => store.users.remove(index),
            None => {
                let id = dto.id.clone().unwrap_or_else(generate_user_id);
                let mut fresh = testing::user(&id, &dto.email, dto.role.unwrap_or_default());
                fresh.name = dto.default_name();
                fresh
            }
        };
        user.email = dto.email.clone();
        if let Some(name) = &dto.name {
            user.name = name.clone();
        }
        if let Some(phone) = &dto.phone {
            user.phone = phone.clone();
        }
        if let Some(role) = dto.role {
            user.role = role;
        }
        if dto.admin_role.is_some() {
            user.admin_role = dto.admin_role;
        }
        if dto.avatar.is_some() {
            user.avatar = dto.avatar.clone();
        }
        if let Some(bookmarks) = &dto.bookmarks {
            user.bookmarks = bookmarks.clone();
        }
        if let Some(verified) = dto.is_email_verified {
            user.is_email_verified = verified;
        }
        user.updated_at = Utc::now();

        store.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, user_id: &str, patch: &UpdateUserDto) -> Result<User, ClientError> {
        let mut store = self.store.lock().unwrap();
        let user = store
            .users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| Self::not_found("User", user_id))?;

        if let Some(name) = &patch.name {
            user.name = name.clone();
        }
        if let Some(email) = &patch.email {
            user.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            user.phone = phone.clone();
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if patch.avatar.is_some() {
            user.avatar = patch.avatar.clone();
        }
        if let Some(bookmarks) = &patch.bookmarks {
            user.bookmarks = bookmarks.clone();
        }
        if let Some(verified) = patch.is_email_verified {
            user.is_email_verified = verified;
        }
        Ok(user.clone())
    }

    async fn verify_email(
        &self,
        user_id: &str,
        profile_id: Option<&str>,
    ) -> Result<VerifyEmailResponseDto, ClientError> {
        let mut store = self.store.lock().unwrap();
        let user = store
            .users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| Self::not_found("User", user_id))?;
        user.is_email_verified = true;
        let user = user.clone();

        if !user.role.is_professional() {
            return Ok(VerifyEmailResponseDto::new(user, None, None));
        }

        let profile = store.profiles.iter_mut().find(|profile| {
            profile.user_id == user.id && profile_id.map_or(true, |id| profile.id == id)
        });
        let Some(profile) = profile else {
            return Ok(VerifyEmailResponseDto::new(user, None, None));
        };

        let transition = verification::confirm_email(user.role, profile.verification_status)
            .map_err(|e| Self::rejected(403, e))?;
        profile.verification_status = transition.status();
        let profile = profile.clone();

        Ok(VerifyEmailResponseDto::new(user, Some(profile), Some(transition)))
    }

    async fn get_profiles(&self, user_id: Option<&str>) -> Result<Vec<CaProfile>, ClientError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .profiles
            .iter()
            .filter(|profile| user_id.map_or(true, |id| profile.user_id == id))
            .cloned()
            .collect())
    }

    async fn get_profile(&self, profile_id: &str) -> Result<Option<CaProfile>, ClientError> {
        let store = self.store.lock().unwrap();
        Ok(store.profiles.iter().find(|profile| profile.id == profile_id).cloned())
    }

    async fn save_profile(&self, dto: &UpsertProfileDto) -> Result<CaProfile, ClientError> {
        let mut store = self.store.lock().unwrap();
        let id = dto.id.clone().unwrap_or_else(|| format!("ca-{}", store.profiles.len() + 1));
        store.profiles.retain(|profile| profile.id != id);

        let mut profile = testing::profile(&id, Default::default(), dto.rating.unwrap_or(0.0));
        profile.user_id = dto.user_id.clone();
        profile.name = dto.name.clone();
        profile.professional_type = dto.professional_type.unwrap_or_default();
        if let Some(coordinates) = dto.coordinates() {
            profile.latitude = coordinates.latitude;
            profile.longitude = coordinates.longitude;
        }
        store.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn update_profile(
        &self,
        profile_id: &str,
        patch: &UpdateProfileDto,
    ) -> Result<CaProfile, ClientError> {
        let mut store = self.store.lock().unwrap();
        let profile = store
            .profiles
            .iter_mut()
            .find(|profile| profile.id == profile_id)
            .ok_or_else(|| Self::not_found("Profile", profile_id))?;

        if let Some(name) = &patch.name {
            profile.name = name.clone();
        }
        if patch.avatar.is_some() {
            profile.avatar = patch.avatar.clone();
        }
        if let Some(is_online) = patch.is_online {
            profile.is_online = is_online;
        }
        if let Some(rating) = patch.rating {
            profile.rating = rating;
        }
        Ok(profile.clone())
    }

    async fn review_profile(
        &self,
        profile_id: &str,
        review: &ReviewProfileDto,
    ) -> Result<CaProfile, ClientError> {
        let mut store = self.store.lock().unwrap();
        let profile = store
            .profiles
            .iter_mut()
            .find(|profile| profile.id == profile_id)
            .ok_or_else(|| Self::not_found("Profile", profile_id))?;

        let outcome = verification::review(
            profile.verification_status,
            review.decision,
            review.feedback.as_deref(),
        )
        .map_err(|e| Self::rejected(409, e))?;
        profile.verification_status = outcome.status;
        profile.is_verified = outcome.is_verified;
        profile.admin_feedback = outcome.admin_feedback;
        Ok(profile.clone())
    }

    async fn search_profiles(&self, criteria: &SearchCriteria) -> Result<Vec<CaProfile>, ClientError> {
        let profiles = self.store.lock().unwrap().profiles.clone();
        Ok(discovery::search(profiles, criteria))
    }

    async fn get_messages(&self, user_id: &str) -> Result<Vec<DirectMessage>, ClientError> {
        let store = self.store.lock().unwrap();
        let mut messages: Vec<DirectMessage> = store
            .messages
            .iter()
            .filter(|message| message.involves(user_id))
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(messages)
    }

    async fn send_message(&self, dto: &SendMessageDto) -> Result<DirectMessage, ClientError> {
        {
            let store = self.store.lock().unwrap();
            let listing = match dto.ca_profile_id.as_deref() {
                Some(id) => Some(
                    store
                        .profiles
                        .iter()
                        .find(|profile| profile.id == id)
                        .ok_or_else(|| Self::not_found("Profile", id))?,
                ),
                None => None,
            };
            let receiver_role = store
                .users
                .iter()
                .find(|user| user.id == dto.receiver_id)
                .map(|user| user.role);
            contact::can_contact(
                &dto.sender_id,
                &dto.receiver_id,
                receiver_role,
                &store.profiles,
                listing,
            )
            .map_err(|e| Self::rejected(403, e))?;
        }

        let message = DirectMessage {
            id: dto.id.clone().unwrap_or_else(generate_message_id),
            sender_id: dto.sender_id.clone(),
            sender_name: dto.sender_name.clone().unwrap_or_default(),
            receiver_id: dto.receiver_id.clone(),
            ca_profile_id: dto.ca_profile_id.clone(),
            ca_name: dto.ca_name.clone(),
            subject: dto.subject.clone().unwrap_or_default(),
            content: dto.content.clone(),
            sent_at: dto.timestamp.unwrap_or_else(Utc::now),
            is_read: false,
        };
        self.add_message(message.clone());
        Ok(message)
    }

    async fn mark_messages_read(&self, request: &MarkReadDto) -> Result<u64, ClientError> {
        let mut store = self.store.lock().unwrap();
        let mut updated = 0;
        for message in store.messages.iter_mut() {
            if message.is_unread_for(&request.user_id) && message.sender_id == request.contact_id {
                message.is_read = true;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn get_reviews(&self, ca_id: &str) -> Result<Vec<Review>, ClientError> {
        let store = self.store.lock().unwrap();
        Ok(store
            .reviews
            .iter()
            .filter(|review| review.ca_id == ca_id)
            .cloned()
            .collect())
    }

    async fn get_nearby(&self, origin: Coordinates) -> Result<Vec<NearbyProfile>, ClientError> {
        let store = self.store.lock().unwrap();
        let mut nearby: Vec<NearbyProfile> = store
            .profiles
            .iter()
            .filter(|profile| discovery::is_discoverable(profile))
            .map(|profile| NearbyProfile {
                profile: profile.clone(),
                distance_km: haversine_km(origin, profile),
            })
            .filter(|nearby| nearby.distance_km <= RADIUS_KM)
            .collect();
        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        Ok(nearby)
    }
}
