//! `EntitlementResolver`: answers `LookupResources` by candidate-by-candidate
//! evaluation, grounded on the same load-then-evaluate shape the
//! `DecisionEngine` uses for a single `Authorize` request.

use std::sync::Arc;

use cedar_policy::{Authorizer, Request as CedarRequest};
use hodei_cache::CacheSource;
use thiserror::Error;

use crate::engine::{build_entities, build_policy_set, combine_provenance, EntityRef, EngineError};
use crate::projector::PermissionProjector;
use crate::providers::{EntityProvider, PolicyProvider, ProviderError};
use crate::translate::{self, TranslateError};

#[derive(Debug, Error)]
pub enum EntitlementError {
    #[error("failed to load policies: {0}")]
    PolicyLoad(#[source] ProviderError),
    #[error("failed to load entities: {0}")]
    EntityLoad(#[source] ProviderError),
    #[error("failed to enumerate candidates: {0}")]
    CandidateLookup(#[source] ProviderError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Translate(#[from] TranslateError),
}

pub type EntitlementResult<T> = Result<T, EntitlementError>;

pub struct LookupResourcesRequest {
    pub application_id: String,
    pub principal: EntityRef,
    pub action: EntityRef,
    pub resource_type: String,
    pub context: serde_json::Value,
}

pub struct EntitlementResolver {
    policy_provider: Arc<dyn PolicyProvider>,
    entity_provider: Arc<dyn EntityProvider>,
    authorizer: Authorizer,
}

impl EntitlementResolver {
    pub fn new(policy_provider: Arc<dyn PolicyProvider>, entity_provider: Arc<dyn EntityProvider>) -> Self {
        Self {
            policy_provider,
            entity_provider,
            authorizer: Authorizer::new(),
        }
    }

    /// Returns the resource ids of `resource_type` the principal may act
    /// upon, in Store enumeration order. Unknown resource types yield an
    /// empty set without error, per the spec's boundary case.
    #[tracing::instrument(skip(self, request), fields(application_id = %request.application_id))]
    pub async fn lookup_resources(
        &self,
        request: &LookupResourcesRequest,
    ) -> EntitlementResult<(Vec<String>, CacheSource)> {
        let (versions, policy_source) = self
            .policy_provider
            .active_policies(&request.application_id)
            .await
            .map_err(EntitlementError::PolicyLoad)?;
        let (records, entity_source) = self
            .entity_provider
            .entities(&request.application_id)
            .await
            .map_err(EntitlementError::EntityLoad)?;

        let policy_set = build_policy_set(&versions)?;
        let entities = build_entities(&records)?;

        let candidates = self
            .entity_provider
            .search_entity_ids(&request.application_id, &request.resource_type)
            .await
            .map_err(EntitlementError::CandidateLookup)?;

        // A pre-filter MAY short-circuit candidates the projector proves the
        // principal has no permits on, but MUST NOT alter the observable
        // result, so it is only used to skip evaluation work, never to add
        // or remove a final answer. Group memberships must be loaded the
        // same way the list_permissions adapter does, or a principal granted
        // access only via a group clause would be wrongly filtered out.
        let group_ids = self
            .entity_provider
            .group_memberships(&request.application_id, &request.principal.entity_type, &request.principal.id)
            .await
            .map_err(EntitlementError::CandidateLookup)?;

        let projector = PermissionProjector;
        let projection = projector.project(&versions, &request.principal, &group_ids);
        let principal_has_any_permit_on_type = projection
            .permissions
            .iter()
            .any(|entry| entry.effect == crate::projector::Effect::Permit
                && (entry.resource_types.iter().any(|t| t == "*" || t == &request.resource_type)));

        if !principal_has_any_permit_on_type {
            return Ok((vec![], combine_provenance(policy_source, entity_source)));
        }

        let principal_uid = translate::entity_uid(&request.principal.entity_type, &request.principal.id)?;
        let action_uid = translate::entity_uid(&request.action.entity_type, &request.action.id)?;
        let context = translate::json_context_to_cedar(&request.context)?;

        let mut allowed = Vec::new();
        for candidate in &candidates {
            let resource_uid = translate::entity_uid(&request.resource_type, candidate)?;
            let cedar_request = CedarRequest::new(
                principal_uid.clone(),
                action_uid.clone(),
                resource_uid,
                context.clone(),
                None,
            )
            .map_err(|err| EngineError::InvalidRequest(err.to_string()))?;

            let response = self.authorizer.is_authorized(&cedar_request, &policy_set, &entities);
            if response.decision() == cedar_policy::Decision::Allow {
                allowed.push(candidate.clone());
            }
        }

        Ok((allowed, combine_provenance(policy_source, entity_source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kernel::{EntityRecord, PolicyVersion, PolicyVersionStatus};
    use std::collections::HashMap;

    struct FixedPolicyProvider(Vec<PolicyVersion>);
    struct FixedEntityProvider {
        entities: Vec<EntityRecord>,
        candidates: Vec<String>,
    }

    #[async_trait]
    impl PolicyProvider for FixedPolicyProvider {
        async fn active_policies(&self, _application_id: &str) -> crate::providers::ProviderResult<(Vec<PolicyVersion>, CacheSource)> {
            Ok((self.0.clone(), CacheSource::Db))
        }
    }

    #[async_trait]
    impl EntityProvider for FixedEntityProvider {
        async fn entities(&self, _application_id: &str) -> crate::providers::ProviderResult<(Vec<EntityRecord>, CacheSource)> {
            Ok((self.entities.clone(), CacheSource::L1))
        }
        async fn search_entity_ids(&self, _a: &str, _t: &str) -> crate::providers::ProviderResult<Vec<String>> {
            Ok(self.candidates.clone())
        }
        async fn group_memberships(&self, _a: &str, _t: &str, _i: &str) -> crate::providers::ProviderResult<Vec<(String, String)>> {
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
            status: PolicyVersionStatus::Approved,
            approver: None,
            approved_at: None,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn entity(entity_type: &str, entity_id: &str, owner: Option<&str>) -> EntityRecord {
        let mut attributes = HashMap::new();
        if let Some(owner) = owner {
            attributes.insert("owner".to_string(), kernel::StoredAttribute::String(owner.to_string()));
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

    #[tokio::test]
    async fn returns_exactly_the_allowed_candidates_in_store_order() {
        let versions = vec![policy_version(
            "p1",
            r#"permit(principal == User::"alice", action == Action::"view", resource is Document);"#,
        )];
        let entities = vec![
            entity("User", "alice", None),
            entity("Document", "demo-doc", Some("alice")),
            entity("Document", "other-doc", Some("bob")),
            entity("Action", "view", None),
        ];
        let resolver = EntitlementResolver::new(
            Arc::new(FixedPolicyProvider(versions)),
            Arc::new(FixedEntityProvider {
                entities,
                candidates: vec!["demo-doc".to_string(), "other-doc".to_string()],
            }),
        );

        let request = LookupResourcesRequest {
            application_id: "app-1".to_string(),
            principal: EntityRef::new("User", "alice"),
            action: EntityRef::new("Action", "view"),
            resource_type: "Document".to_string(),
            context: serde_json::json!({}),
        };

        let (allowed, _source) = resolver.lookup_resources(&request).await.unwrap();
        assert_eq!(allowed, vec!["demo-doc".to_string(), "other-doc".to_string()]);
    }

    #[tokio::test]
    async fn unknown_resource_type_returns_empty_without_error() {
        let resolver = EntitlementResolver::new(
            Arc::new(FixedPolicyProvider(vec![])),
            Arc::new(FixedEntityProvider {
                entities: vec![],
                candidates: vec![],
            }),
        );
        let request = LookupResourcesRequest {
            application_id: "app-1".to_string(),
            principal: EntityRef::new("User", "alice"),
            action: EntityRef::new("Action", "view"),
            resource_type: "Nonexistent".to_string(),
            context: serde_json::json!({}),
        };
        let (allowed, _source) = resolver.lookup_resources(&request).await.unwrap();
        assert!(allowed.is_empty());
    }
}
