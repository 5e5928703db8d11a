use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    models::{
        profilemodel::CaProfile,
        usermodel::{AdminRole, User, UserRole},
    },
    service::verification::Transition,
};

/// Body of `POST /users`: creates the user, or replaces the provided fields of the
/// record matching `id` or `email`.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1-100 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(max = 20, message = "Phone number must be at most 20 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_role: Option<AdminRole>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmarks: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_email_verified: Option<bool>,
}

impl UpsertUserDto {
    /// Name used when creating a record without one: the upper-cased local part of the email.
    pub fn default_name(&self) -> String {
        self.email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_uppercase()
    }
}

/// Body of `PATCH /users/:id`. Absent fields are left untouched.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1-100 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[validate(email(message = "Email is invalid"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[validate(length(max = 20, message = "Phone number must be at most 20 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_role: Option<AdminRole>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmarks: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_email_verified: Option<bool>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UserQueryDto {
    pub email: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailDto {
    pub profile_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailResponseDto {
    pub user: User,
    pub profile: Option<CaProfile>,
    /// True when the profile was moved into the admin review queue by this call.
    pub queued_for_review: bool,
}

impl VerifyEmailResponseDto {
    pub fn new(user: User, profile: Option<CaProfile>, transition: Option<Transition>) -> Self {
        VerifyEmailResponseDto {
            user,
            profile,
            queued_for_review: matches!(transition, Some(Transition::Advanced { .. })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_is_upper_cased_local_part() {
        let dto = UpsertUserDto {
            email: "priya.sharma@example.com".into(),
            ..Default::default()
        };
        assert_eq!(dto.default_name(), "PRIYA.SHARMA");
    }

    #[test]
    fn invalid_email_fails_validation() {
        let dto = UpsertUserDto {
            email: "not-an-email".into(),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let dto = UpdateUserDto {
            bookmarks: Some(vec!["ca1".into()]),
            ..Default::default()
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json, serde_json::json!({ "bookmarks": ["ca1"] }));
    }
}
