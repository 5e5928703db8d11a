// client/session.rs
//! Signed-in state for a client. A `Session` is an immutable snapshot of the user;
//! every operation that changes the user hands back a fresh one.

use subtle::ConstantTimeEq;

use super::{
    api::{ClientError, MarketplaceApi},
    storage::ClientConfig,
};
use crate::{
    dtos::{
        profiledtos::UpdateProfileDto,
        userdtos::{UpdateUserDto, UpsertUserDto},
    },
    models::usermodel::{
        AdminRole, User, UserRole, ADMIN_AVATAR_SEED, ADMIN_NAME, ADMIN_PHONE, ADMIN_USER_ID,
    },
    service::toggles::{toggle_bookmark, BookmarkChange},
    utils::{avatar::signup_avatar, id_generator::generate_user_id},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user: User,
}

impl Session {
    fn new(user: User) -> Self {
        Session { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == UserRole::Admin
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Success(Session),
    NotFound,
    InvalidPassword,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignupOutcome {
    Success(Session),
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailVerified {
    pub session: Session,
    /// True when the owned profile entered the admin review queue.
    pub queued_for_review: bool,
}

pub struct AuthContext<A> {
    api: A,
    admin_email: String,
    admin_password: Option<String>,
}

impl<A: MarketplaceApi> AuthContext<A> {
    pub fn new(api: A, config: &ClientConfig) -> Self {
        AuthContext {
            api,
            admin_email: config.admin_email.to_lowercase(),
            admin_password: config.admin_password.clone(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn login(
        &self,
        email: &str,
        password: Option<&str>,
    ) -> Result<LoginOutcome, ClientError> {
        let email = email.trim().to_lowercase();

        if email == self.admin_email {
            if !self.admin_password_matches(password) {
                tracing::warn!("Rejected administrator login for {}", email);
                return Ok(LoginOutcome::InvalidPassword);
            }
            let admin = match self.find_by_email(&email).await? {
                Some(admin) => admin,
                None => self.api.save_user(&self.admin_record()).await?,
            };
            return Ok(LoginOutcome::Success(Session::new(admin)));
        }

        Ok(match self.find_by_email(&email).await? {
            Some(user) => LoginOutcome::Success(Session::new(user)),
            None => LoginOutcome::NotFound,
        })
    }

    pub async fn signup(
        &self,
        email: &str,
        name: Option<&str>,
        role: UserRole,
    ) -> Result<SignupOutcome, ClientError> {
        let email = email.trim();
        if self.find_by_email(email).await?.is_some() {
            return Ok(SignupOutcome::AlreadyExists);
        }

        let mut record = UpsertUserDto {
            id: Some(generate_user_id()),
            email: email.to_lowercase(),
            phone: Some(String::new()),
            role: Some(role),
            avatar: Some(signup_avatar(email)),
            bookmarks: Some(Vec::new()),
            is_email_verified: Some(false),
            ..Default::default()
        };
        record.name = Some(match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => record.default_name(),
        });

        let user = self.api.save_user(&record).await?;
        if role.is_professional() {
            tracing::info!("Professional account {} created; onboarding required", user.id);
        }

        Ok(SignupOutcome::Success(Session::new(user)))
    }

    /// Re-reads the user; `None` once the account no longer exists.
    pub async fn refresh(&self, session: &Session) -> Result<Option<Session>, ClientError> {
        Ok(self.api.get_user(&session.user.id).await?.map(Session::new))
    }

    /// Saves the patch, then mirrors a new avatar onto the owned professional profile.
    /// The two writes are independent; a failed second write is returned as an error
    /// after the user record has already changed.
    pub async fn update_profile(
        &self,
        session: &Session,
        patch: &UpdateUserDto,
    ) -> Result<Session, ClientError> {
        let updated = self.api.update_user(&session.user.id, patch).await?;

        if let Some(avatar) = patch.avatar.as_deref() {
            if session.user.role.is_professional() {
                let owned = self.api.get_profiles(Some(&session.user.id)).await?;
                if let Some(profile) = owned.first() {
                    self.api
                        .update_profile(&profile.id, &UpdateProfileDto::avatar(avatar))
                        .await?;
                }
            }
        }

        Ok(Session::new(updated))
    }

    pub async fn toggle_bookmark(
        &self,
        session: &Session,
        profile_id: &str,
    ) -> Result<(Session, BookmarkChange), ClientError> {
        let current = self
            .api
            .get_user(&session.user.id)
            .await?
            .ok_or_else(|| ClientError::NotFound(format!("User {}", session.user.id)))?;

        let (bookmarks, change) = toggle_bookmark(&current.bookmarks, profile_id);
        let patch = UpdateUserDto {
            bookmarks: Some(bookmarks),
            ..Default::default()
        };
        let updated = self.api.update_user(&current.id, &patch).await?;

        Ok((Session::new(updated), change))
    }

    pub async fn verify_email(
        &self,
        session: &Session,
        profile_id: Option<&str>,
    ) -> Result<EmailVerified, ClientError> {
        let response = self.api.verify_email(&session.user.id, profile_id).await?;

        Ok(EmailVerified {
            session: Session::new(response.user),
            queued_for_review: response.queued_for_review,
        })
    }

    pub fn logout(&self, session: Session) {
        tracing::debug!("User {} signed out", session.user.id);
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ClientError> {
        let users = self.api.get_users(Some(email)).await?;
        Ok(users
            .into_iter()
            .find(|user| user.email.eq_ignore_ascii_case(email)))
    }

    fn admin_password_matches(&self, given: Option<&str>) -> bool {
        match (given, self.admin_password.as_deref()) {
            (Some(given), Some(expected)) => given.as_bytes().ct_eq(expected.as_bytes()).into(),
            _ => false,
        }
    }

    fn admin_record(&self) -> UpsertUserDto {
        UpsertUserDto {
            id: Some(ADMIN_USER_ID.to_string()),
            name: Some(ADMIN_NAME.to_string()),
            email: self.admin_email.clone(),
            phone: Some(ADMIN_PHONE.to_string()),
            role: Some(UserRole::Admin),
            admin_role: Some(AdminRole::Super),
            avatar: Some(signup_avatar(ADMIN_AVATAR_SEED)),
            bookmarks: Some(Vec::new()),
            is_email_verified: Some(true),
        }
    }
}
