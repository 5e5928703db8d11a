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
    db::{profiledb::ProfileExt, userdb::UserExt},
    dtos::profiledtos::{ProfileQueryDto, ReviewProfileDto, UpdateProfileDto, UpsertProfileDto},
    error::{ErrorMessage, HttpError},
    models::{profilemodel::VerificationStatus, usermodel::UserRole},
    service::{
        discovery::{self, SearchCriteria},
        error::ServiceError,
        verification,
    },
    AppState,
};

pub fn profiles_handler() -> Router {
    Router::new()
        .route("/", get(get_profiles).post(upsert_profile))
        .route("/search", get(search_profiles))
        .route("/queue", get(get_review_queue))
        .route("/:profile_id", get(get_profile).patch(update_profile))
        .route("/:profile_id/review", post(review_profile))
}

pub async fn get_profiles(
    query: Result<Query<ProfileQueryDto>, QueryRejection>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let Query(query) = query?;
    let profiles = app_state
        .db_client
        .get_profiles(query.user_id.as_deref())
        .await?;

    Ok(Json(profiles))
}

pub async fn search_profiles(
    criteria: Result<Query<SearchCriteria>, QueryRejection>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let Query(criteria) = criteria?;
    let verified = app_state
        .db_client
        .get_profiles_by_status(VerificationStatus::Verified)
        .await?;

    Ok(Json(discovery::search(verified, &criteria)))
}

pub async fn get_review_queue(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let profiles = app_state.db_client.get_profiles(None).await?;

    Ok(Json(verification::review_queue(profiles)))
}

pub async fn get_profile(
    Path(profile_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let profile = app_state
        .db_client
        .get_profile(&profile_id)
        .await?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::ProfileNotFound.to_string()))?;

    Ok(Json(profile))
}

pub async fn upsert_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    body: Result<Json<UpsertProfileDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let outcome = app_state.db_client.upsert_profile(&body).await?;
    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(outcome.into_inner())))
}

pub async fn update_profile(
    Path(profile_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
    body: Result<Json<UpdateProfileDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let profile = app_state
        .db_client
        .update_profile(&profile_id, &body)
        .await?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::ProfileNotFound.to_string()))?;

    Ok(Json(profile))
}

pub async fn review_profile(
    Path(profile_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
    body: Result<Json<ReviewProfileDto>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(body) = body?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    // Refuse a bare rejection before touching any record.
    verification::require_feedback(body.decision, body.feedback.as_deref())
        .map_err(ServiceError::from)?;

    let reviewer = app_state.db_client.get_user(&body.reviewer_id).await?;
    if !reviewer.is_some_and(|user| user.role == UserRole::Admin) {
        return Err(ServiceError::NotAnAdmin(body.reviewer_id.clone()).into());
    }

    let (profile, outcome) = app_state
        .db_client
        .review_profile(&profile_id, body.decision, body.feedback.as_deref())
        .await?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::ProfileNotFound.to_string()))?;

    if outcome.changed {
        tracing::info!(
            "Profile {} marked {} by {}",
            profile.id,
            outcome.status.to_str(),
            body.reviewer_id
        );
    }

    Ok(Json(profile))
}
