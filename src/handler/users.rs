use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::{UpdateUserDto, UpsertUserDto, UserQueryDto, VerifyEmailDto, VerifyEmailResponseDto},
    error::{ErrorMessage, HttpError},
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/", get(get_users).post(upsert_user))
        .route("/:user_id", get(get_user).patch(update_user))
        .route("/:user_id/verify-email", post(verify_email))
}

pub async fn get_users(
    query: Result<Query<UserQueryDto>, QueryRejection>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let Query(query) = query?;
    let email = query.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    let users = app_state.db_client.get_users(email).await?;

    Ok(Json(users))
}

pub async fn get_user(
    Path(user_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(&user_id)
        .await?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::UserNotFound.to_string()))?;

    Ok(Json(user))
}

pub async fn upsert_user(
    Extension(app_state): Extension<Arc<AppState>>,
    body: Result<Json<UpsertUserDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let outcome = app_state.db_client.upsert_user(&body).await?;
    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let user = outcome.into_inner();
    tracing::debug!("Saved user {} ({})", user.id, status);

    Ok((status, Json(user)))
}

pub async fn update_user(
    Path(user_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
    body: Result<Json<UpdateUserDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .update_user(&user_id, &body)
        .await?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::UserNotFound.to_string()))?;

    Ok(Json(user))
}

pub async fn verify_email(
    Path(user_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
    body: Option<Json<VerifyEmailDto>>,
) -> Result<impl IntoResponse, HttpError> {
    let profile_id = body.and_then(|Json(dto)| dto.profile_id);

    let confirmation = app_state
        .db_client
        .confirm_email(&user_id, profile_id.as_deref())
        .await?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::UserNotFound.to_string()))?;

    Ok(Json(VerifyEmailResponseDto::new(
        confirmation.user,
        confirmation.profile,
        confirmation.transition,
    )))
}
