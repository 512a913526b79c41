//! `GET /apps/{id}/permissions?principal_type=&principal_id=`.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use policies::engine::EntityRef;
use policies::features::list_permissions::ListPermissionsCommand;

use crate::app_state::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListPermissionsQuery {
    pub principal_type: String,
    pub principal_id: String,
}

pub async fn list_permissions(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
    Query(query): Query<ListPermissionsQuery>,
) -> Result<Response, ApiError> {
    state.cluster_registry.record_request();

    let command = ListPermissionsCommand {
        application_id,
        principal: EntityRef::new(query.principal_type, query.principal_id),
    };
    let result = state.list_permissions.execute(command).await?;
    Ok(Json(result).into_response())
}
