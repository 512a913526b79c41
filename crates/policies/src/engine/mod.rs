//! The `DecisionEngine`: evaluates one `Authorize` request against an
//! application's active policy set and entity graph.
//!
//! Generalizes `AuthorizationEngine` (the former `TestUser`/fixed-document
//! engine) to arbitrary `{type, id}` principal/resource pairs and a JSON
//! context, completing its context-translation step.

use std::sync::Arc;

use cedar_policy::{Authorizer, Entities, Policy, PolicySet, Request as CedarRequest};
use hodei_cache::CacheSource;
use kernel::PolicyVersion;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::providers::{EntityProvider, PolicyProvider, ProviderError};
use crate::translate::{self, TranslateError};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to load policies: {0}")]
    PolicyLoad(#[source] ProviderError),
    #[error("failed to load entities: {0}")]
    EntityLoad(#[source] ProviderError),
    #[error("active policy {policy_id} failed to parse: {reason}")]
    PolicySyntax { policy_id: String, reason: String },
    #[error("failed to build entity set: {0}")]
    EntityTranslation(#[from] TranslateError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// A logical `(type, id)` reference, e.g. `User::"alice"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub id: String,
}

impl EntityRef {
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub application_id: String,
    pub principal: EntityRef,
    pub action: EntityRef,
    pub resource: EntityRef,
    pub context: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationResult {
    pub decision: Decision,
    pub reasons: Vec<String>,
    pub errors: Vec<String>,
}

impl AuthorizationResult {
    pub(crate) fn from_response(response: &cedar_policy::Response) -> Self {
        let decision = match response.decision() {
            cedar_policy::Decision::Allow => Decision::Allow,
            cedar_policy::Decision::Deny => Decision::Deny,
        };
        let diagnostics = response.diagnostics();
        let reasons = diagnostics.reason().map(|id| id.to_string()).collect();
        let errors = diagnostics.errors().map(|err| err.to_string()).collect();
        Self {
            decision,
            reasons,
            errors,
        }
    }
}

/// Combines two cache-provenance readings into the single scalar the spec
/// threads through a request: the least-fresh tier wins, since that is the
/// tier that actually bounds observable staleness for this request.
pub fn combine_provenance(a: CacheSource, b: CacheSource) -> CacheSource {
    fn rank(s: CacheSource) -> u8 {
        match s {
            CacheSource::L1 => 0,
            CacheSource::L2 => 1,
            CacheSource::Db => 2,
        }
    }
    if rank(a) >= rank(b) {
        a
    } else {
        b
    }
}

pub struct DecisionEngine {
    policy_provider: Arc<dyn PolicyProvider>,
    entity_provider: Arc<dyn EntityProvider>,
    authorizer: Authorizer,
}

impl DecisionEngine {
    pub fn new(policy_provider: Arc<dyn PolicyProvider>, entity_provider: Arc<dyn EntityProvider>) -> Self {
        Self {
            policy_provider,
            entity_provider,
            authorizer: Authorizer::new(),
        }
    }

    /// Evaluates one `Authorize` request, returning the decision plus the
    /// combined cache provenance for the two loads this request performed.
    #[tracing::instrument(skip(self, request), fields(application_id = %request.application_id))]
    pub async fn authorize(
        &self,
        request: &AuthorizationRequest,
    ) -> EngineResult<(AuthorizationResult, CacheSource)> {
        let (versions, policy_source) = self
            .policy_provider
            .active_policies(&request.application_id)
            .await
            .map_err(EngineError::PolicyLoad)?;
        let (records, entity_source) = self
            .entity_provider
            .entities(&request.application_id)
            .await
            .map_err(EngineError::EntityLoad)?;

        let policy_set = build_policy_set(&versions)?;
        let entities = build_entities(&records)?;

        let principal = translate::entity_uid(&request.principal.entity_type, &request.principal.id)?;
        let action = translate::entity_uid(&request.action.entity_type, &request.action.id)?;
        let resource = translate::entity_uid(&request.resource.entity_type, &request.resource.id)?;
        let context = translate::json_context_to_cedar(&request.context)?;

        let cedar_request = CedarRequest::new(principal, action, resource, context, None)
            .map_err(|err| EngineError::InvalidRequest(err.to_string()))?;

        let response = self.authorizer.is_authorized(&cedar_request, &policy_set, &entities);
        let result = AuthorizationResult::from_response(&response);

        tracing::debug!(decision = ?result.decision, reasons = ?result.reasons, "evaluated authorization request");

        Ok((result, combine_provenance(policy_source, entity_source)))
    }
}

/// Parses an application's active policy versions into a `PolicySet`.
/// Shared with `EntitlementResolver`, which evaluates the same set against
/// many synthesized requests.
pub(crate) fn build_policy_set(versions: &[PolicyVersion]) -> EngineResult<PolicySet> {
    let mut set = PolicySet::new();
    for version in versions {
        let policy = Policy::parse(Some(version.policy_id.clone().into()), &version.policy_text).map_err(
            |err| EngineError::PolicySyntax {
                policy_id: version.policy_id.clone(),
                reason: err.to_string(),
            },
        )?;
        set.add(policy).map_err(|err| EngineError::PolicySyntax {
            policy_id: version.policy_id.clone(),
            reason: err.to_string(),
        })?;
    }
    Ok(set)
}

/// Translates a loaded entity set into Cedar's `Entities` snapshot.
pub(crate) fn build_entities(records: &[kernel::EntityRecord]) -> EngineResult<Entities> {
    let mut cedar_entities = Vec::with_capacity(records.len());
    for record in records {
        cedar_entities.push(translate::entity_record_to_cedar(record)?);
    }
    Entities::from_entities(cedar_entities, None)
        .map_err(|err| EngineError::InvalidRequest(format!("invalid entity set: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ProviderResult};
    use async_trait::async_trait;
    use kernel::EntityRecord;
    use std::collections::HashMap;

    struct FixedPolicyProvider(Vec<PolicyVersion>);
    struct FixedEntityProvider(Vec<EntityRecord>);

    #[async_trait]
    impl PolicyProvider for FixedPolicyProvider {
        async fn active_policies(&self, _application_id: &str) -> ProviderResult<(Vec<PolicyVersion>, CacheSource)> {
            Ok((self.0.clone(), CacheSource::Db))
        }
    }

    #[async_trait]
    impl EntityProvider for FixedEntityProvider {
        async fn entities(&self, _application_id: &str) -> ProviderResult<(Vec<EntityRecord>, CacheSource)> {
            Ok((self.0.clone(), CacheSource::L1))
        }

        async fn search_entity_ids(&self, _a: &str, _t: &str) -> ProviderResult<Vec<String>> {
            Ok(vec![])
        }

        async fn group_memberships(&self, _a: &str, _t: &str, _i: &str) -> ProviderResult<Vec<(String, String)>> {
            Ok(vec![])
        }
    }

    fn policy_version(id: &str, text: &str) -> PolicyVersion {
        PolicyVersion {
            id: format!("{id}-v1"),
            policy_id: id.to_string(),
            version: 1,
            policy_text: text.to_string(),
            is_active: true,
            status: kernel::PolicyVersionStatus::Approved,
            approver: None,
            approved_at: None,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn entity_record(entity_type: &str, entity_id: &str, owner: Option<&str>) -> EntityRecord {
        let mut attributes = HashMap::new();
        if let Some(owner) = owner {
            attributes.insert(
                "owner".to_string(),
                kernel::StoredAttribute::String(owner.to_string()),
            );
        }
        EntityRecord {
            id: format!("{entity_type}-{entity_id}"),
            application_id: "app-1".to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            attributes,
            parents: vec![],
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            updated_at: time::OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn sample_engine() -> DecisionEngine {
        let versions = vec![policy_version(
            "p1",
            r#"permit(principal == User::"alice", action == Action::"view", resource == Document::"demo-doc");"#,
        )];
        let entities = vec![
            entity_record("User", "alice", None),
            entity_record("User", "bob", None),
            entity_record("Document", "demo-doc", Some("alice")),
            entity_record("Action", "view", None),
        ];
        DecisionEngine::new(
            Arc::new(FixedPolicyProvider(versions)),
            Arc::new(FixedEntityProvider(entities)),
        )
    }

    #[tokio::test]
    async fn allows_matching_principal() {
        let engine = sample_engine();
        let request = AuthorizationRequest {
            application_id: "app-1".to_string(),
            principal: EntityRef::new("User", "alice"),
            action: EntityRef::new("Action", "view"),
            resource: EntityRef::new("Document", "demo-doc"),
            context: serde_json::json!({}),
        };
        let (result, source) = engine.authorize(&request).await.unwrap();
        assert_eq!(result.decision, Decision::Allow);
        assert_eq!(result.reasons.len(), 1);
        assert_eq!(source, CacheSource::Db);
    }

    #[tokio::test]
    async fn denies_by_default_for_unmatched_principal() {
        let engine = sample_engine();
        let request = AuthorizationRequest {
            application_id: "app-1".to_string(),
            principal: EntityRef::new("User", "bob"),
            action: EntityRef::new("Action", "view"),
            resource: EntityRef::new("Document", "demo-doc"),
            context: serde_json::json!({}),
        };
        let (result, _source) = engine.authorize(&request).await.unwrap();
        assert_eq!(result.decision, Decision::Deny);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn combine_provenance_prefers_least_fresh() {
        assert_eq!(combine_provenance(CacheSource::L1, CacheSource::Db), CacheSource::Db);
        assert_eq!(combine_provenance(CacheSource::L2, CacheSource::L1), CacheSource::L2);
        assert_eq!(combine_provenance(CacheSource::L1, CacheSource::L1), CacheSource::L1);
    }
}
