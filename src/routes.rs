// routes.rs
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit, response::IntoResponse, routing::get, Extension, Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::{ErrorMessage, HttpError},
    handler::{
        discovery::discovery_handler, messages::messages_handler, profiles::profiles_handler,
        reviews::reviews_handler, users::users_handler,
    },
    AppState,
};

/// Profile photos travel inline as base64.
const BODY_LIMIT_BYTES: usize = 25 * 1024 * 1024;

async fn health_check(Extension(app_state): Extension<Arc<AppState>>) -> Json<serde_json::Value> {
    let database = match app_state.db_client.ping().await {
        Ok(()) => "connected",
        Err(err) => {
            tracing::warn!("Health check could not reach the database: {}", err);
            "disconnected"
        }
    };

    Json(json!({
        "status": "ok",
        "database": database
    }))
}

async fn route_not_found() -> impl IntoResponse {
    HttpError::not_found(ErrorMessage::RouteNotFound.to_string())
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/users", users_handler())
        .nest("/profiles", profiles_handler())
        .nest("/messages", messages_handler())
        .nest("/reviews", reviews_handler())
        .merge(discovery_handler())
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
}
