//! `POST /apps/{id}/policies` and `POST /apps/{id}/policies/{pid}/versions/{v}/activate`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use policies::features::create_policy::CreatePolicyCommand;

use crate::app_state::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreatePolicyBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub policy_text: String,
    #[serde(default)]
    pub activate: bool,
}

pub async fn create_policy(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
    Json(body): Json<CreatePolicyBody>,
) -> Result<Response, ApiError> {
    state.cluster_registry.record_request();

    let command = CreatePolicyCommand {
        application_id: application_id.clone(),
        name: body.name,
        description: body.description,
        policy_text: body.policy_text,
    };
    let result = state.create_policy.execute(command).await?;

    if body.activate {
        state
            .activate_policy_version
            .execute(policies::features::activate_policy_version::ActivatePolicyVersionCommand {
                application_id,
                version_id: result.version_id.clone(),
            })
            .await?;
    }

    Ok((StatusCode::CREATED, Json(result)).into_response())
}

pub async fn activate_policy_version(
    State(state): State<AppState>,
    Path((application_id, policy_id, version)): Path<(String, String, u32)>,
) -> Result<StatusCode, ApiError> {
    state.cluster_registry.record_request();

    let versions = state.store.list_policy_versions(&policy_id).await?;
    let version_id = versions
        .into_iter()
        .find(|v| v.version == version)
        .map(|v| v.id)
        .ok_or_else(|| ApiError::NotFound(format!("policy {policy_id} has no version {version}")))?;

    state
        .activate_policy_version
        .execute(policies::features::activate_policy_version::ActivatePolicyVersionCommand {
            application_id,
            version_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
