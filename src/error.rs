use std::fmt;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

#[derive(Debug, PartialEq)]
pub enum ErrorMessage {
    RouteNotFound,
    UserNotFound,
    ProfileNotFound,
    CoordinatesMissing,
    PermissionDenied,
    EmailExist,
    RecordExist,
    ProfileNotContactable,
    ServerError,
}

impl ErrorMessage {
    fn to_str(&self) -> &'static str {
        match self {
            ErrorMessage::RouteNotFound => "API Route Not Found",
            ErrorMessage::UserNotFound => "User not found",
            ErrorMessage::ProfileNotFound => "Profile not found",
            ErrorMessage::CoordinatesMissing => "Coordinates missing",
            ErrorMessage::PermissionDenied => "You are not allowed to perform this action",
            ErrorMessage::EmailExist => "An account with this email already exists",
            ErrorMessage::RecordExist => "A record with this id already exists",
            ErrorMessage::ProfileNotContactable => "You can only contact fully verified professionals.",
            ErrorMessage::ServerError => "Server Error. Please try again later",
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpError {
    pub message: String,
    pub status: StatusCode,
}

impl HttpError {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        HttpError {
            message: message.into(),
            status,
        }
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::BAD_REQUEST)
    }

    pub fn unique_constraint_violation(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::CONFLICT)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::FORBIDDEN)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::NOT_FOUND)
    }

    pub fn into_http_response(self) -> Response {
        let json_response = Json(ErrorResponse {
            status: "fail".to_string(),
            message: self.message.clone(),
        });

        (self.status, json_response).into_response()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HttpError: message: {}, status: {}",
            self.message, self.status
        )
    }
}

impl std::error::Error for HttpError {}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// Malformed bodies keep axum's status and text but use the JSON error body.
impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::new(rejection.body_text(), rejection.status())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        HttpError::new(rejection.body_text(), rejection.status())
    }
}

/// Database failures surface as 500s, except unique-key clashes which are conflicts.
impl From<sqlx::Error> for HttpError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                let message = match db_err.constraint() {
                    Some("users_email_lower_idx") => ErrorMessage::EmailExist.to_string(),
                    _ => ErrorMessage::RecordExist.to_string(),
                };
                return HttpError::unique_constraint_violation(message);
            }
        }
        tracing::error!("database error: {}", err);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    }
}
