//! The `Store` port: the single persistence boundary the decision engine,
//! policy features and cluster admission use cases depend on.
//!
//! Implementations live in `hodei-store` (a SurrealDB-backed adapter and an
//! in-memory test double). Every method that mutates policy/entity/backend
//! state is expected to be transactional at the row level; `Store` makes no
//! promise of cross-call transactions.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::model::{
    Application, AuditRecord, BackendInstance, BackendStatus, ClusterAuthConfig, EntityRecord,
    Namespace, Policy, PolicyVersion, Schema,
};

/// Errors surfaced by a `Store` implementation.
///
/// Maps to the cross-cutting error table: `NotFound` and `Conflict` are
/// client-facing (404/409), `Unavailable`/`Internal` are server-facing
/// (503/500).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("internal store error: {0}")]
    Internal(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence boundary for tenant configuration, policies, entities and
/// cluster admission state.
#[async_trait]
pub trait Store: Send + Sync {
    // -- Namespaces --------------------------------------------------
    async fn create_namespace(&self, namespace: Namespace) -> StoreResult<Namespace>;
    async fn get_namespace(&self, id: &str) -> StoreResult<Namespace>;
    async fn list_namespaces(&self) -> StoreResult<Vec<Namespace>>;
    async fn delete_namespace(&self, id: &str) -> StoreResult<()>;

    // -- Applications --------------------------------------------------
    async fn create_application(&self, application: Application) -> StoreResult<Application>;
    async fn get_application(&self, id: &str) -> StoreResult<Application>;
    async fn list_applications(&self, namespace_id: &str) -> StoreResult<Vec<Application>>;
    /// Soft-deletes the application; the application and its descendants
    /// remain retrievable by id but are excluded from listings.
    async fn soft_delete_application(&self, id: &str) -> StoreResult<()>;

    // -- Policies & versions --------------------------------------------
    async fn create_policy(&self, policy: Policy) -> StoreResult<Policy>;
    async fn get_policy(&self, id: &str) -> StoreResult<Policy>;
    async fn list_policies(&self, application_id: &str) -> StoreResult<Vec<Policy>>;
    async fn delete_policy(&self, id: &str) -> StoreResult<()>;

    /// Appends a new, monotonically versioned `PolicyVersion` for `policy_id`.
    /// Never rewrites an existing version.
    async fn upsert_policy_version(&self, version: PolicyVersion) -> StoreResult<PolicyVersion>;

    async fn get_policy_version(&self, id: &str) -> StoreResult<PolicyVersion>;
    async fn list_policy_versions(&self, policy_id: &str) -> StoreResult<Vec<PolicyVersion>>;

    /// Marks `version_id` active for its policy, clearing `is_active` on any
    /// previously active version of the same policy in the same operation.
    /// Fails with `StoreError::Conflict` if the target version's status is
    /// not `Approved`.
    async fn activate_policy_version(&self, version_id: &str) -> StoreResult<PolicyVersion>;

    /// Returns the Cedar text of every currently active policy version for
    /// an application — the working policy set for decision-making.
    async fn active_policies(&self, application_id: &str) -> StoreResult<Vec<PolicyVersion>>;

    // -- Entities --------------------------------------------------------
    async fn upsert_entity(&self, entity: EntityRecord) -> StoreResult<EntityRecord>;
    async fn get_entity(
        &self,
        application_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> StoreResult<EntityRecord>;
    async fn delete_entity(
        &self,
        application_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> StoreResult<()>;

    /// All entities for an application, used to build the Cedar `Entities`
    /// snapshot the decision engine evaluates against.
    async fn entities(&self, application_id: &str) -> StoreResult<Vec<EntityRecord>>;

    /// Candidate resource ids of `resource_type` for `LookupResources`,
    /// optionally narrowed by `group_membership` (entities reachable via a
    /// parent edge from one of the given parent refs).
    async fn search_entity_ids(
        &self,
        application_id: &str,
        resource_type: &str,
    ) -> StoreResult<Vec<String>>;

    /// Parent-edge closure for an entity, used by `PermissionProjector` and
    /// group-scoped lookups.
    async fn group_memberships(
        &self,
        application_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> StoreResult<Vec<(String, String)>>;

    // -- Schemas -----------------------------------------------------------
    async fn upsert_schema(&self, schema: Schema) -> StoreResult<Schema>;
    async fn active_schema(&self, application_id: &str) -> StoreResult<Option<Schema>>;

    // -- Audit ---------------------------------------------------------------
    async fn append_audit(&self, record: AuditRecord) -> StoreResult<AuditRecord>;
    async fn list_audit(&self, application_id: &str, limit: usize) -> StoreResult<Vec<AuditRecord>>;

    // -- Cluster auth config -------------------------------------------------
    async fn get_cluster_auth_config(&self) -> StoreResult<ClusterAuthConfig>;
    async fn put_cluster_auth_config(&self, config: ClusterAuthConfig) -> StoreResult<ClusterAuthConfig>;

    // -- Backend admission ----------------------------------------------------
    async fn create_backend_instance(&self, instance: BackendInstance) -> StoreResult<BackendInstance>;
    async fn get_backend_instance(&self, instance_id: &str) -> StoreResult<BackendInstance>;
    async fn list_backend_instances(
        &self,
        status: Option<BackendStatus>,
    ) -> StoreResult<Vec<BackendInstance>>;

    /// Applies an admission transition, validated against
    /// `BackendStatus::can_transition_to` by the caller before persistence;
    /// implementations re-check the invariant and return
    /// `StoreError::Conflict` on a disallowed transition race.
    async fn transition_backend_instance(
        &self,
        instance_id: &str,
        next: BackendStatus,
    ) -> StoreResult<BackendInstance>;

    async fn record_backend_heartbeat(&self, instance_id: &str) -> StoreResult<()>;
}
