//! Maps internal errors onto the HTTP surface per the cross-cutting error
//! table: malformed input is a client error, storage/evaluator failures
//! are distinguished from genuine policy problems, and nothing here ever
//! panics on a well-formed but rejected request.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use hodei_cluster::{AdmissionError, CaError, PeerAuthError};
use kernel::StoreError;
use policies::engine::EngineError;
use policies::entitlement::EntitlementError;
use policies::features::activate_policy_version::ActivatePolicyVersionError;
use policies::features::authorize::AuthorizeError;
use policies::features::create_policy::CreatePolicyError;
use policies::features::list_permissions::ListPermissionsError;
use policies::features::lookup_resources::LookupResourcesError;
use policies::features::upsert_entity::UpsertEntityError;
use policies::providers::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("authentication required")]
    Unauthenticated,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("policy syntax error: {0}")]
    PolicySyntax(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            ApiError::PolicySyntax(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Store(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        if status != StatusCode::UNAUTHORIZED {
            tracing::warn!(status = %status, error = %message, "request failed");
            return (status, Json(ErrorBody { error: message })).into_response();
        }

        tracing::warn!(status = %status, error = %message, "request failed");
        let mut response = (status, Json(ErrorBody { error: message })).into_response();
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, header::HeaderValue::from_static("Bearer"));
        response
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::InvalidRequest(msg) => ApiError::InvalidRequest(msg),
            StoreError::Unavailable(msg) | StoreError::Internal(msg) => ApiError::Store(msg),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Store(err) => err.into(),
            ProviderError::Cache(msg) => ApiError::Store(msg),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::PolicyLoad(err) | EngineError::EntityLoad(err) => err.into(),
            EngineError::PolicySyntax { policy_id, reason } => {
                ApiError::Internal(format!("active policy {policy_id} is malformed: {reason}"))
            }
            EngineError::EntityTranslation(err) => ApiError::InvalidRequest(err.to_string()),
            EngineError::InvalidRequest(msg) => ApiError::InvalidRequest(msg),
        }
    }
}

impl From<EntitlementError> for ApiError {
    fn from(err: EntitlementError) -> Self {
        match err {
            EntitlementError::PolicyLoad(err) | EntitlementError::EntityLoad(err) | EntitlementError::CandidateLookup(err) => {
                err.into()
            }
            EntitlementError::Engine(err) => err.into(),
            EntitlementError::Translate(err) => ApiError::InvalidRequest(err.to_string()),
        }
    }
}

impl From<ListPermissionsError> for ApiError {
    fn from(err: ListPermissionsError) -> Self {
        match err {
            ListPermissionsError::Provider(err) => err.into(),
        }
    }
}

impl From<AuthorizeError> for ApiError {
    fn from(err: AuthorizeError) -> Self {
        match err {
            AuthorizeError::InvalidRequest(msg) => ApiError::InvalidRequest(msg),
            AuthorizeError::Engine(err) => err.into(),
        }
    }
}

impl From<LookupResourcesError> for ApiError {
    fn from(err: LookupResourcesError) -> Self {
        match err {
            LookupResourcesError::Resolver(err) => err.into(),
        }
    }
}

impl From<CreatePolicyError> for ApiError {
    fn from(err: CreatePolicyError) -> Self {
        match err {
            CreatePolicyError::PolicySyntax { reason } => ApiError::PolicySyntax(reason),
            CreatePolicyError::Store(err) => err.into(),
        }
    }
}

impl From<ActivatePolicyVersionError> for ApiError {
    fn from(err: ActivatePolicyVersionError) -> Self {
        match err {
            ActivatePolicyVersionError::Store(err) => err.into(),
        }
    }
}

impl From<UpsertEntityError> for ApiError {
    fn from(err: UpsertEntityError) -> Self {
        match err {
            UpsertEntityError::InvalidAttribute(msg) => ApiError::InvalidRequest(msg),
            UpsertEntityError::Store(err) => err.into(),
        }
    }
}

impl From<AdmissionError> for ApiError {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::NotFound(msg) => ApiError::NotFound(msg),
            AdmissionError::Conflict(msg) => ApiError::Conflict(msg),
            AdmissionError::Store(err) => err.into(),
            AdmissionError::Ca(err) => err.into(),
        }
    }
}

impl From<CaError> for ApiError {
    fn from(err: CaError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

impl From<PeerAuthError> for ApiError {
    fn from(err: PeerAuthError) -> Self {
        match err {
            PeerAuthError::Mismatch => ApiError::Unauthenticated,
            PeerAuthError::SecretTooShort | PeerAuthError::Bcrypt(_) => ApiError::InvalidRequest(err.to_string()),
        }
    }
}
