//! `POST /apps/{id}/lookup-resources`, the REST surface the `LookupResources`
//! gRPC RPC mirrors.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use policies::engine::EntityRef;
use policies::features::lookup_resources::LookupResourcesCommand;

use crate::app_state::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LookupResourcesBody {
    pub principal: EntityRef,
    pub action: EntityRef,
    pub resource_type: String,
    #[serde(default)]
    pub context: serde_json::Value,
}

pub async fn lookup_resources(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
    Json(body): Json<LookupResourcesBody>,
) -> Result<Response, ApiError> {
    state.cluster_registry.record_request();

    let command = LookupResourcesCommand {
        application_id,
        principal: body.principal,
        action: body.action,
        resource_type: body.resource_type,
        context: body.context,
    };
    let result = state.lookup_resources.execute(command).await?;
    Ok(Json(result).into_response())
}
