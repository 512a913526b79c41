//! The `PolicyDecisionPoint` gRPC service: `Check`, `BatchCheck`,
//! `LookupResources`, mirroring the REST `/authorize` and
//! `/apps/{id}/lookup-resources` semantics over tonic. Authenticated
//! caller identity is carried via the `authorization` metadata entry and
//! resolved through the same [`crate::auth`] path as the REST surface.

pub mod pdp {
    tonic::include_proto!("hodei.pdp.v1");
}

use tonic::{Request, Response, Status};

use policies::engine::{Decision, EntityRef};
use policies::features::authorize::AuthorizeCommand;
use policies::features::lookup_resources::LookupResourcesCommand;

use crate::app_state::AppState;
use crate::auth::authenticate;
use crate::config::AuthConfig;
use pdp::policy_decision_point_server::{PolicyDecisionPoint, PolicyDecisionPointServer};
use pdp::{
    BatchCheckRequest, BatchCheckResponse, CheckRequest, CheckResponse, LookupResourcesRequest, LookupResourcesResponse,
};

pub struct PdpService {
    state: AppState,
    auth: AuthConfig,
}

impl PdpService {
    pub fn new(state: AppState, auth: AuthConfig) -> PolicyDecisionPointServer<Self> {
        PolicyDecisionPointServer::new(Self { state, auth })
    }

    fn authenticate<T>(&self, request: &Request<T>) -> Result<(), Status> {
        let (mut parts, _) = http::Request::builder().body(()).unwrap().into_parts();
        if let Some(Ok(value)) = request.metadata().get("authorization").map(|v| v.to_str()) {
            if let Ok(header) = axum::http::HeaderValue::from_str(value) {
                parts.headers.insert(axum::http::header::AUTHORIZATION, header);
            }
        }
        authenticate(&self.auth, &parts, "grpc-peer", self.auth.mode != "none")
            .map(|_| ())
            .map_err(|_| Status::unauthenticated("invalid or missing credentials"))
    }

    async fn do_check(&self, req: CheckRequest) -> Result<CheckResponse, Status> {
        let context: serde_json::Value = if req.context_json.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&req.context_json).map_err(|e| Status::invalid_argument(e.to_string()))?
        };

        let principal = req.principal.ok_or_else(|| Status::invalid_argument("principal is required"))?;
        let action = req.action.ok_or_else(|| Status::invalid_argument("action is required"))?;
        let resource = req.resource.ok_or_else(|| Status::invalid_argument("resource is required"))?;

        let command = AuthorizeCommand {
            application_id: req.application_id,
            principal: EntityRef::new(principal.r#type, principal.id),
            action: EntityRef::new(action.r#type, action.id),
            resource: EntityRef::new(resource.r#type, resource.id),
            context,
        };

        let result = self
            .state
            .authorize
            .execute(command)
            .await
            .map_err(|e| Status::internal(e.to_string()))?;

        Ok(CheckResponse {
            decision: match result.decision {
                Decision::Allow => "allow".to_string(),
                Decision::Deny => "deny".to_string(),
            },
            reasons: result.reasons,
            errors: result.errors,
            cache_source: result.cache_source,
        })
    }
}

#[tonic::async_trait]
impl PolicyDecisionPoint for PdpService {
    async fn check(&self, request: Request<CheckRequest>) -> Result<Response<CheckResponse>, Status> {
        self.authenticate(&request)?;
        self.state.cluster_registry.record_request();
        let response = self.do_check(request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn batch_check(&self, request: Request<BatchCheckRequest>) -> Result<Response<BatchCheckResponse>, Status> {
        self.authenticate(&request)?;
        self.state.cluster_registry.record_request();

        let req = request.into_inner();
        let mut results = Vec::with_capacity(req.items.len());
        for item in req.items {
            results.push(self.do_check(item).await?);
        }

        Ok(Response::new(BatchCheckResponse { results }))
    }

    async fn lookup_resources(
        &self,
        request: Request<LookupResourcesRequest>,
    ) -> Result<Response<LookupResourcesResponse>, Status> {
        self.authenticate(&request)?;
        self.state.cluster_registry.record_request();

        let req = request.into_inner();
        let context: serde_json::Value = if req.context_json.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&req.context_json).map_err(|e| Status::invalid_argument(e.to_string()))?
        };
        let principal = req.principal.ok_or_else(|| Status::invalid_argument("principal is required"))?;
        let action = req.action.ok_or_else(|| Status::invalid_argument("action is required"))?;

        let command = LookupResourcesCommand {
            application_id: req.application_id,
            principal: EntityRef::new(principal.r#type, principal.id),
            action: EntityRef::new(action.r#type, action.id),
            resource_type: req.resource_type,
            context,
        };

        let result = self
            .state
            .lookup_resources
            .execute(command)
            .await
            .map_err(|e| Status::internal(e.to_string()))?;

        Ok(Response::new(LookupResourcesResponse {
            resource_ids: result.resource_ids,
            cache_source: result.cache_source,
        }))
    }
}
