use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};

use crate::{
    db::profiledb::ProfileExt,
    dtos::profiledtos::CoordinatesQueryDto,
    error::{ErrorMessage, HttpError},
    models::profilemodel::VerificationStatus,
    service::discovery::FeaturedProfiles,
    AppState,
};

pub fn discovery_handler() -> Router {
    Router::new()
        .route("/nearby", get(get_nearby))
        .route("/discover/featured", get(get_featured))
}

pub async fn get_nearby(
    query: Result<Query<CoordinatesQueryDto>, QueryRejection>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let Query(query) = query?;
    let origin = query
        .coordinates()
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::CoordinatesMissing.to_string()))?;

    let profiles = app_state
        .db_client
        .get_nearby_profiles(origin, app_state.env.nearby_radius_km)
        .await?;

    Ok(Json(profiles))
}

/// Nearby professionals when a location is known, else the best rated ones.
pub async fn get_featured(
    query: Result<Query<CoordinatesQueryDto>, QueryRejection>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let Query(query) = query?;
    let limit = app_state.env.featured_limit;

    if let Some(origin) = query.coordinates() {
        let nearby = app_state
            .db_client
            .get_nearby_profiles(origin, app_state.env.nearby_radius_km)
            .await?;
        if let Some(featured) = FeaturedProfiles::from_nearby(nearby, limit) {
            return Ok(Json(featured));
        }
        tracing::debug!(
            "No profiles within {} km of ({}, {}), using top rated",
            app_state.env.nearby_radius_km,
            origin.latitude,
            origin.longitude
        );
    }

    let verified = app_state
        .db_client
        .get_profiles_by_status(VerificationStatus::Verified)
        .await?;

    Ok(Json(FeaturedProfiles::top_rated(verified, limit)))
}
