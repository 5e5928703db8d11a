use axum::http::StatusCode;
use thiserror::Error;

use crate::{
    error::{ErrorMessage, HttpError},
    service::verification::VerificationError,
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("User {0} is not allowed to review profiles")]
    NotAnAdmin(String),

    #[error("Profile {0} is not open for contact")]
    ProfileNotContactable(String),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Database(err) => HttpError::from(err),
            ServiceError::NotAnAdmin(ref user_id) => {
                tracing::warn!("Review attempt by non-admin {}", user_id);
                HttpError::forbidden(ErrorMessage::PermissionDenied.to_string())
            }
            ServiceError::ProfileNotContactable(_) => {
                HttpError::forbidden(ErrorMessage::ProfileNotContactable.to_string())
            }
            other => HttpError::new(other.to_string(), other.status_code()),
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotAnAdmin(_) | ServiceError::ProfileNotContactable(_) => StatusCode::FORBIDDEN,

            ServiceError::Verification(VerificationError::NotProfessional(_)) => StatusCode::FORBIDDEN,

            ServiceError::Verification(VerificationError::ConflictingDecision { .. })
            | ServiceError::Verification(VerificationError::NotAwaitingReview(_)) => StatusCode::CONFLICT,

            ServiceError::Verification(VerificationError::MissingFeedback) => StatusCode::BAD_REQUEST,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
