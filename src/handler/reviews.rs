use std::sync::Arc;

use axum::{extract::Path, response::IntoResponse, routing::get, Extension, Json, Router};

use crate::{db::reviewdb::ReviewExt, error::HttpError, AppState};

pub fn reviews_handler() -> Router {
    Router::new().route("/:ca_id", get(get_reviews))
}

pub async fn get_reviews(
    Path(ca_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let reviews = app_state.db_client.get_reviews_for_profile(&ca_id).await?;

    Ok(Json(reviews))
}
