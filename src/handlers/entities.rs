//! `GET /apps/{id}/entities` and `POST /apps/{id}/entities`.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use policies::features::upsert_entity::{ParentRefDto, UpsertEntityCommand};

use crate::app_state::AppState;
use crate::error::ApiError;

pub async fn list_entities(State(state): State<AppState>, Path(application_id): Path<String>) -> Result<Response, ApiError> {
    state.cluster_registry.record_request();
    let entities = state.store.entities(&application_id).await?;
    Ok(Json(entities).into_response())
}

#[derive(Debug, serde::Deserialize)]
pub struct UpsertEntityBody {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id: String,
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub parents: Vec<ParentRefBody>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ParentRefBody {
    #[serde(rename = "type")]
    pub parent_type: String,
    pub id: String,
}

pub async fn upsert_entity(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
    Json(body): Json<UpsertEntityBody>,
) -> Result<Response, ApiError> {
    state.cluster_registry.record_request();

    let command = UpsertEntityCommand {
        application_id,
        entity_type: body.entity_type,
        entity_id: body.id,
        attributes: body.attributes,
        parents: body
            .parents
            .into_iter()
            .map(|p| ParentRefDto {
                parent_type: p.parent_type,
                parent_id: p.id,
            })
            .collect(),
    };

    let result = state.upsert_entity.execute(command).await?;
    Ok((StatusCode::OK, Json(result)).into_response())
}
