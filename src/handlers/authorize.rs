//! `POST /authorize`.

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use policies::features::authorize::AuthorizeCommand;

use crate::app_state::AppState;
use crate::error::ApiError;

pub async fn authorize(State(state): State<AppState>, Json(command): Json<AuthorizeCommand>) -> Result<Response, ApiError> {
    state.cluster_registry.record_request();

    let result = state.authorize.execute(command).await?;
    let cache_source = result.cache_source.clone();

    let mut response = (StatusCode::OK, Json(result)).into_response();
    if let Ok(value) = HeaderValue::from_str(&cache_source) {
        response.headers_mut().insert("X-Cache-Source", value);
    }
    Ok(response)
}
