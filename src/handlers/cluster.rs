//! `GET /cluster/instances`, `GET /cluster/backends`, and the backend
//! admission transition endpoints.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use hodei_cluster::RegisterRequest;
use kernel::BackendStatus;

use crate::app_state::AppState;
use crate::error::ApiError;

/// Cluster liveness view; exempt from rate limiting.
pub async fn list_instances(State(state): State<AppState>) -> Response {
    let instances = state.cluster_registry.list_instances().await;
    Json(instances).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ListBackendsQuery {
    pub status: Option<String>,
}

pub async fn list_backends(
    State(state): State<AppState>,
    axum::extract::Query(query): axum::extract::Query<ListBackendsQuery>,
) -> Result<Response, ApiError> {
    let status = match query.status.as_deref() {
        Some("pending") => Some(BackendStatus::Pending),
        Some("approved") => Some(BackendStatus::Approved),
        Some("rejected") => Some(BackendStatus::Rejected),
        Some("suspended") => Some(BackendStatus::Suspended),
        Some("deleted") => Some(BackendStatus::Deleted),
        Some(other) => return Err(ApiError::InvalidRequest(format!("unknown backend status '{other}'"))),
        None => None,
    };
    let backends = state.backend_admission.list(status).await?;
    Ok(Json(backends).into_response())
}

#[derive(Debug, Deserialize)]
pub struct RegisterBackendBody {
    pub instance_id: String,
    pub hostname: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub csr_pem: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub cedar_version: String,
    pub os: String,
    pub arch: String,
}

pub async fn register_backend(
    State(state): State<AppState>,
    Json(body): Json<RegisterBackendBody>,
) -> Result<Response, ApiError> {
    let req = RegisterRequest {
        instance_id: body.instance_id,
        hostname: body.hostname,
        ip_address: body.ip_address,
        csr_pem: body.csr_pem,
        metadata: body.metadata,
        cedar_version: body.cedar_version,
        os: body.os,
        arch: body.arch,
    };
    let instance = state.backend_admission.register(req).await?;
    Ok((StatusCode::CREATED, Json(instance)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct ApproveBody {
    pub approver: String,
}

pub async fn approve_backend(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Json(body): Json<ApproveBody>,
) -> Result<Response, ApiError> {
    let instance = state.backend_admission.approve(&instance_id, &body.approver).await?;
    Ok(Json(instance).into_response())
}

#[derive(Debug, Deserialize)]
pub struct RejectBody {
    pub rejector: String,
    pub reason: String,
}

pub async fn reject_backend(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Json(body): Json<RejectBody>,
) -> Result<Response, ApiError> {
    let instance = state
        .backend_admission
        .reject(&instance_id, &body.rejector, &body.reason)
        .await?;
    Ok(Json(instance).into_response())
}

pub async fn suspend_backend(State(state): State<AppState>, Path(instance_id): Path<String>) -> Result<Response, ApiError> {
    let instance = state.backend_admission.suspend(&instance_id).await?;
    Ok(Json(instance).into_response())
}

pub async fn unsuspend_backend(State(state): State<AppState>, Path(instance_id): Path<String>) -> Result<Response, ApiError> {
    let instance = state.backend_admission.unsuspend(&instance_id).await?;
    Ok(Json(instance).into_response())
}
