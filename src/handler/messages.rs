use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::{messagedb::MessageExt, profiledb::ProfileExt, userdb::UserExt},
    dtos::messagedtos::{MarkReadDto, MarkReadResponseDto, SendMessageDto},
    error::{ErrorMessage, HttpError},
    service::{contact, conversation::aggregate_conversations},
    AppState,
};

pub fn messages_handler() -> Router {
    Router::new()
        .route("/", post(send_message))
        .route("/read", patch(mark_as_read))
        .route("/:user_id", get(get_messages))
        .route("/:user_id/conversations", get(get_conversations))
}

pub async fn get_messages(
    Path(user_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let messages = app_state.db_client.get_user_messages(&user_id).await?;

    Ok(Json(messages))
}

pub async fn get_conversations(
    Path(user_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let messages = app_state.db_client.get_user_messages(&user_id).await?;
    let directory = app_state.db_client.get_users(None).await?;

    Ok(Json(aggregate_conversations(&messages, &directory, &user_id)))
}

pub async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    body: Result<Json<SendMessageDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let listing = match body.ca_profile_id.as_deref() {
        Some(profile_id) => Some(
            app_state
                .db_client
                .get_profile(profile_id)
                .await?
                .ok_or_else(|| HttpError::not_found(ErrorMessage::ProfileNotFound.to_string()))?,
        ),
        None => None,
    };
    let receiver = app_state.db_client.get_user(&body.receiver_id).await?;
    let receiver_profiles = app_state
        .db_client
        .get_profiles(Some(&body.receiver_id))
        .await?;

    contact::can_contact(
        &body.sender_id,
        &body.receiver_id,
        receiver.map(|user| user.role),
        &receiver_profiles,
        listing.as_ref(),
    )?;

    let sender_name = match body.sender_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => app_state
            .db_client
            .get_user(&body.sender_id)
            .await?
            .map(|user| user.name)
            .unwrap_or_default(),
    };

    let message = app_state.db_client.create_message(&body, &sender_name).await?;
    tracing::debug!("Message {} sent to {}", message.id, message.receiver_id);

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn mark_as_read(
    Extension(app_state): Extension<Arc<AppState>>,
    body: Result<Json<MarkReadDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let updated = app_state
        .db_client
        .mark_messages_as_read(&body.user_id, &body.contact_id)
        .await?;

    Ok(Json(MarkReadResponseDto {
        success: true,
        updated,
    }))
}
