//! SurrealDB-backed `Store`, mirroring the teacher's `SurrealMemStorage`
//! pattern (content-based upsert/select/delete against a single table per
//! aggregate) but generalized across the full tenant data model.

use async_trait::async_trait;
use kernel::{
    Application, AuditRecord, BackendInstance, BackendStatus, ClusterAuthConfig, EntityRecord,
    Namespace, PolicyRecord, PolicyVersion, Schema, Store, StoreError, StoreResult,
};
use surrealdb::engine::any::Any;
use surrealdb::Surreal;

const TBL_NAMESPACES: &str = "namespaces";
const TBL_APPLICATIONS: &str = "applications";
const TBL_POLICIES: &str = "policies";
const TBL_POLICY_VERSIONS: &str = "policy_versions";
const TBL_ENTITIES: &str = "entities";
const TBL_SCHEMAS: &str = "schemas";
const TBL_AUDIT: &str = "audit";
const TBL_CLUSTER_AUTH: &str = "cluster_auth_config";
const TBL_BACKEND_INSTANCES: &str = "backend_instances";
const CLUSTER_AUTH_SINGLETON_ID: &str = "singleton";

/// Connects to any backend SurrealDB supports (`ws://`, `wss://`,
/// `mem://`, embedded `rocksdb://`, …) via the `any` engine, matching the
/// teacher's `embedded_storage`/`mem_storage` feature split without
/// needing two separate adapter structs.
pub struct SurrealStore {
    db: Surreal<Any>,
}

impl SurrealStore {
    pub async fn connect(endpoint: &str, namespace: &str, database: &str) -> Result<Self, StoreError> {
        let db = surrealdb::engine::any::connect(endpoint)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        db.use_ns(namespace)
            .use_db(database)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        Ok(Self { db })
    }

    async fn put<T>(&self, table: &str, id: &str, value: T) -> StoreResult<T>
    where
        T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync + Clone + 'static,
    {
        let _: Option<T> = self
            .db
            .upsert((table, id))
            .content(value.clone())
            .await
            .map_err(|err| StoreError::Internal(err.to_string()))?;
        Ok(value)
    }

    async fn get<T>(&self, table: &str, id: &str) -> StoreResult<T>
    where
        T: serde::de::DeserializeOwned + Send + Sync + 'static,
    {
        let record: Option<T> = self
            .db
            .select((table, id))
            .await
            .map_err(|err| StoreError::Internal(err.to_string()))?;
        record.ok_or_else(|| StoreError::NotFound(format!("{table}/{id}")))
    }

    async fn list<T>(&self, table: &str) -> StoreResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned + Send + Sync + 'static,
    {
        self.db
            .select(table)
            .await
            .map_err(|err| StoreError::Internal(err.to_string()))
    }

    async fn remove(&self, table: &str, id: &str) -> StoreResult<()> {
        let _: Option<serde_json::Value> = self
            .db
            .delete((table, id))
            .await
            .map_err(|err| StoreError::Internal(err.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl Store for SurrealStore {
    async fn create_namespace(&self, namespace: Namespace) -> StoreResult<Namespace> {
        self.put(TBL_NAMESPACES, &namespace.id.clone(), namespace).await
    }

    async fn get_namespace(&self, id: &str) -> StoreResult<Namespace> {
        self.get(TBL_NAMESPACES, id).await
    }

    async fn list_namespaces(&self) -> StoreResult<Vec<Namespace>> {
        self.list(TBL_NAMESPACES).await
    }

    async fn delete_namespace(&self, id: &str) -> StoreResult<()> {
        self.remove(TBL_NAMESPACES, id).await
    }

    async fn create_application(&self, application: Application) -> StoreResult<Application> {
        self.put(TBL_APPLICATIONS, &application.id.clone(), application).await
    }

    async fn get_application(&self, id: &str) -> StoreResult<Application> {
        self.get(TBL_APPLICATIONS, id).await
    }

    async fn list_applications(&self, namespace_id: &str) -> StoreResult<Vec<Application>> {
        let all: Vec<Application> = self.list(TBL_APPLICATIONS).await?;
        Ok(all
            .into_iter()
            .filter(|a| a.namespace_id == namespace_id && !a.is_deleted())
            .collect())
    }

    async fn soft_delete_application(&self, id: &str) -> StoreResult<()> {
        let mut app: Application = self.get(TBL_APPLICATIONS, id).await?;
        app.soft_deleted_at = Some(time::OffsetDateTime::now_utc());
        self.put(TBL_APPLICATIONS, id, app).await?;
        Ok(())
    }

    async fn create_policy(&self, policy: PolicyRecord) -> StoreResult<PolicyRecord> {
        self.put(TBL_POLICIES, &policy.id.clone(), policy).await
    }

    async fn get_policy(&self, id: &str) -> StoreResult<PolicyRecord> {
        self.get(TBL_POLICIES, id).await
    }

    async fn list_policies(&self, application_id: &str) -> StoreResult<Vec<PolicyRecord>> {
        let all: Vec<PolicyRecord> = self.list(TBL_POLICIES).await?;
        Ok(all.into_iter().filter(|p| p.application_id == application_id).collect())
    }

    async fn delete_policy(&self, id: &str) -> StoreResult<()> {
        self.remove(TBL_POLICIES, id).await
    }

    async fn upsert_policy_version(&self, version: PolicyVersion) -> StoreResult<PolicyVersion> {
        self.put(TBL_POLICY_VERSIONS, &version.id.clone(), version).await
    }

    async fn get_policy_version(&self, id: &str) -> StoreResult<PolicyVersion> {
        self.get(TBL_POLICY_VERSIONS, id).await
    }

    async fn list_policy_versions(&self, policy_id: &str) -> StoreResult<Vec<PolicyVersion>> {
        let all: Vec<PolicyVersion> = self.list(TBL_POLICY_VERSIONS).await?;
        Ok(all.into_iter().filter(|v| v.policy_id == policy_id).collect())
    }

    async fn activate_policy_version(&self, version_id: &str) -> StoreResult<PolicyVersion> {
        let target: PolicyVersion = self.get(TBL_POLICY_VERSIONS, version_id).await?;
        if !target.can_activate() {
            return Err(StoreError::Conflict(format!("policy version {version_id} is not approved")));
        }
        let siblings: Vec<PolicyVersion> = self.list_policy_versions(&target.policy_id).await?;
        for mut sibling in siblings {
            sibling.is_active = sibling.id == version_id;
            let id = sibling.id.clone();
            self.put(TBL_POLICY_VERSIONS, &id, sibling).await?;
        }
        self.get(TBL_POLICY_VERSIONS, version_id).await
    }

    async fn active_policies(&self, application_id: &str) -> StoreResult<Vec<PolicyVersion>> {
        let policies = self.list_policies(application_id).await?;
        let policy_ids: std::collections::HashSet<String> = policies.into_iter().map(|p| p.id).collect();
        let all: Vec<PolicyVersion> = self.list(TBL_POLICY_VERSIONS).await?;
        Ok(all
            .into_iter()
            .filter(|v| v.is_active && policy_ids.contains(&v.policy_id))
            .collect())
    }

    async fn upsert_entity(&self, entity: EntityRecord) -> StoreResult<EntityRecord> {
        let id = entity.id.clone();
        self.put(TBL_ENTITIES, &id, entity).await
    }

    async fn get_entity(&self, application_id: &str, entity_type: &str, entity_id: &str) -> StoreResult<EntityRecord> {
        let all: Vec<EntityRecord> = self.list(TBL_ENTITIES).await?;
        all.into_iter()
            .find(|e| e.application_id == application_id && e.entity_type == entity_type && e.entity_id == entity_id)
            .ok_or_else(|| StoreError::NotFound(format!("entity {entity_type}::{entity_id}")))
    }

    async fn delete_entity(&self, application_id: &str, entity_type: &str, entity_id: &str) -> StoreResult<()> {
        let entity = self.get_entity(application_id, entity_type, entity_id).await?;
        self.remove(TBL_ENTITIES, &entity.id).await
    }

    async fn entities(&self, application_id: &str) -> StoreResult<Vec<EntityRecord>> {
        let all: Vec<EntityRecord> = self.list(TBL_ENTITIES).await?;
        Ok(all.into_iter().filter(|e| e.application_id == application_id).collect())
    }

    async fn search_entity_ids(&self, application_id: &str, resource_type: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .entities(application_id)
            .await?
            .into_iter()
            .filter(|e| e.entity_type == resource_type)
            .map(|e| e.entity_id)
            .collect())
    }

    async fn group_memberships(
        &self,
        application_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> StoreResult<Vec<(String, String)>> {
        const MAX_DEPTH: usize = 10;
        let entities = self.entities(application_id).await?;
        let mut visited = std::collections::HashSet::new();
        let mut frontier = vec![(entity_type.to_string(), entity_id.to_string())];
        let mut result = Vec::new();

        for _ in 0..MAX_DEPTH {
            if frontier.is_empty() {
                break;
            }
            let mut next_frontier = Vec::new();
            for (t, id) in frontier {
                if let Some(entity) = entities.iter().find(|e| e.entity_type == t && e.entity_id == id) {
                    for parent in &entity.parents {
                        let key = (parent.parent_type.clone(), parent.parent_id.clone());
                        if visited.insert(key.clone()) {
                            result.push(key.clone());
                            next_frontier.push(key);
                        }
                    }
                }
            }
            frontier = next_frontier;
        }
        Ok(result)
    }

    async fn upsert_schema(&self, schema: Schema) -> StoreResult<Schema> {
        if schema.is_active {
            let all: Vec<Schema> = self.list(TBL_SCHEMAS).await?;
            for mut existing in all.into_iter().filter(|s| s.application_id == schema.application_id) {
                if existing.is_active {
                    existing.is_active = false;
                    let id = existing.id.clone();
                    self.put(TBL_SCHEMAS, &id, existing).await?;
                }
            }
        }
        let id = schema.id.clone();
        self.put(TBL_SCHEMAS, &id, schema).await
    }

    async fn active_schema(&self, application_id: &str) -> StoreResult<Option<Schema>> {
        let all: Vec<Schema> = self.list(TBL_SCHEMAS).await?;
        Ok(all.into_iter().find(|s| s.application_id == application_id && s.is_active))
    }

    async fn append_audit(&self, record: AuditRecord) -> StoreResult<AuditRecord> {
        let id = record.id.clone();
        self.put(TBL_AUDIT, &id, record).await
    }

    async fn list_audit(&self, application_id: &str, limit: usize) -> StoreResult<Vec<AuditRecord>> {
        let mut all: Vec<AuditRecord> = self.list(TBL_AUDIT).await?;
        all.retain(|r| r.application_id.as_deref() == Some(application_id));
        all.sort_by_key(|r| std::cmp::Reverse(r.created_at));
        all.truncate(limit);
        Ok(all)
    }

    async fn get_cluster_auth_config(&self) -> StoreResult<ClusterAuthConfig> {
        match self.get(TBL_CLUSTER_AUTH, CLUSTER_AUTH_SINGLETON_ID).await {
            Ok(config) => Ok(config),
            Err(StoreError::NotFound(_)) => Ok(ClusterAuthConfig::default()),
            Err(other) => Err(other),
        }
    }

    async fn put_cluster_auth_config(&self, config: ClusterAuthConfig) -> StoreResult<ClusterAuthConfig> {
        self.put(TBL_CLUSTER_AUTH, CLUSTER_AUTH_SINGLETON_ID, config).await
    }

    async fn create_backend_instance(&self, instance: BackendInstance) -> StoreResult<BackendInstance> {
        let id = instance.instance_id.clone();
        self.put(TBL_BACKEND_INSTANCES, &id, instance).await
    }

    async fn get_backend_instance(&self, instance_id: &str) -> StoreResult<BackendInstance> {
        self.get(TBL_BACKEND_INSTANCES, instance_id).await
    }

    async fn list_backend_instances(&self, status: Option<BackendStatus>) -> StoreResult<Vec<BackendInstance>> {
        let all: Vec<BackendInstance> = self.list(TBL_BACKEND_INSTANCES).await?;
        Ok(all.into_iter().filter(|i| status.map(|s| i.status == s).unwrap_or(true)).collect())
    }

    async fn transition_backend_instance(&self, instance_id: &str, next: BackendStatus) -> StoreResult<BackendInstance> {
        let mut instance: BackendInstance = self.get(TBL_BACKEND_INSTANCES, instance_id).await?;
        if !instance.status.can_transition_to(next) {
            return Err(StoreError::Conflict(format!(
                "cannot transition backend {instance_id} from {:?} to {next:?}",
                instance.status
            )));
        }
        instance.status = next;
        self.put(TBL_BACKEND_INSTANCES, instance_id, instance).await
    }

    async fn record_backend_heartbeat(&self, instance_id: &str) -> StoreResult<()> {
        let mut instance: BackendInstance = self.get(TBL_BACKEND_INSTANCES, instance_id).await?;
        instance.last_heartbeat_at = Some(time::OffsetDateTime::now_utc());
        self.put(TBL_BACKEND_INSTANCES, instance_id, instance).await?;
        Ok(())
    }
}
