//! In-memory `Store` and `Bus` test doubles. Useful for unit tests and for
//! the embedded single-node deployment mode where a full SurrealDB/Redis
//! deployment would be overkill.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use kernel::{
    Application, AuditRecord, BackendInstance, BackendStatus, Bus, BusError, BusResult,
    ChangeEvent, ClusterAuthConfig, EntityRecord, Namespace, PolicyRecord, PolicyVersion, Schema,
    Store, StoreError, StoreResult,
};
use tokio::sync::{broadcast, RwLock};

#[derive(Default)]
struct StoreState {
    namespaces: HashMap<String, Namespace>,
    applications: HashMap<String, Application>,
    policies: HashMap<String, PolicyRecord>,
    policy_versions: HashMap<String, PolicyVersion>,
    entities: HashMap<(String, String, String), EntityRecord>,
    schemas: HashMap<String, Schema>,
    audit: Vec<AuditRecord>,
    cluster_auth_config: Option<ClusterAuthConfig>,
    backend_instances: HashMap<String, BackendInstance>,
}

/// A non-persistent `Store` backed by in-process `HashMap`s, guarded by a
/// single `RwLock` — adequate for tests and for the single-node embedded
/// mode where there is no fleet to share state with.
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
        }
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_namespace(&self, namespace: Namespace) -> StoreResult<Namespace> {
        let mut state = self.state.write().await;
        state.namespaces.insert(namespace.id.clone(), namespace.clone());
        Ok(namespace)
    }

    async fn get_namespace(&self, id: &str) -> StoreResult<Namespace> {
        self.state
            .read()
            .await
            .namespaces
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("namespace {id}")))
    }

    async fn list_namespaces(&self) -> StoreResult<Vec<Namespace>> {
        Ok(self.state.read().await.namespaces.values().cloned().collect())
    }

    async fn delete_namespace(&self, id: &str) -> StoreResult<()> {
        self.state.write().await.namespaces.remove(id);
        Ok(())
    }

    async fn create_application(&self, application: Application) -> StoreResult<Application> {
        let mut state = self.state.write().await;
        state.applications.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    async fn get_application(&self, id: &str) -> StoreResult<Application> {
        self.state
            .read()
            .await
            .applications
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("application {id}")))
    }

    async fn list_applications(&self, namespace_id: &str) -> StoreResult<Vec<Application>> {
        Ok(self
            .state
            .read()
            .await
            .applications
            .values()
            .filter(|a| a.namespace_id == namespace_id && !a.is_deleted())
            .cloned()
            .collect())
    }

    async fn soft_delete_application(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let app = state
            .applications
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("application {id}")))?;
        app.soft_deleted_at = Some(time::OffsetDateTime::now_utc());
        Ok(())
    }

    async fn create_policy(&self, policy: PolicyRecord) -> StoreResult<PolicyRecord> {
        let mut state = self.state.write().await;
        state.policies.insert(policy.id.clone(), policy.clone());
        Ok(policy)
    }

    async fn get_policy(&self, id: &str) -> StoreResult<PolicyRecord> {
        self.state
            .read()
            .await
            .policies
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("policy {id}")))
    }

    async fn list_policies(&self, application_id: &str) -> StoreResult<Vec<PolicyRecord>> {
        Ok(self
            .state
            .read()
            .await
            .policies
            .values()
            .filter(|p| p.application_id == application_id)
            .cloned()
            .collect())
    }

    async fn delete_policy(&self, id: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.policies.remove(id);
        state.policy_versions.retain(|_, v| v.policy_id != id);
        Ok(())
    }

    async fn upsert_policy_version(&self, version: PolicyVersion) -> StoreResult<PolicyVersion> {
        let mut state = self.state.write().await;
        state.policy_versions.insert(version.id.clone(), version.clone());
        Ok(version)
    }

    async fn get_policy_version(&self, id: &str) -> StoreResult<PolicyVersion> {
        self.state
            .read()
            .await
            .policy_versions
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("policy version {id}")))
    }

    async fn list_policy_versions(&self, policy_id: &str) -> StoreResult<Vec<PolicyVersion>> {
        Ok(self
            .state
            .read()
            .await
            .policy_versions
            .values()
            .filter(|v| v.policy_id == policy_id)
            .cloned()
            .collect())
    }

    async fn activate_policy_version(&self, version_id: &str) -> StoreResult<PolicyVersion> {
        let mut state = self.state.write().await;
        let target = state
            .policy_versions
            .get(version_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("policy version {version_id}")))?;

        if !target.can_activate() {
            return Err(StoreError::Conflict(format!(
                "policy version {version_id} is not approved"
            )));
        }

        let policy_id = target.policy_id.clone();
        for version in state.policy_versions.values_mut() {
            if version.policy_id == policy_id {
                version.is_active = version.id == version_id;
            }
        }
        Ok(state.policy_versions.get(version_id).cloned().unwrap())
    }

    async fn active_policies(&self, application_id: &str) -> StoreResult<Vec<PolicyVersion>> {
        let state = self.state.read().await;
        let policy_ids: Vec<String> = state
            .policies
            .values()
            .filter(|p| p.application_id == application_id)
            .map(|p| p.id.clone())
            .collect();
        Ok(state
            .policy_versions
            .values()
            .filter(|v| v.is_active && policy_ids.contains(&v.policy_id))
            .cloned()
            .collect())
    }

    async fn upsert_entity(&self, entity: EntityRecord) -> StoreResult<EntityRecord> {
        let mut state = self.state.write().await;
        let key = (
            entity.application_id.clone(),
            entity.entity_type.clone(),
            entity.entity_id.clone(),
        );
        state.entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn get_entity(
        &self,
        application_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> StoreResult<EntityRecord> {
        let key = (
            application_id.to_string(),
            entity_type.to_string(),
            entity_id.to_string(),
        );
        self.state
            .read()
            .await
            .entities
            .get(&key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("entity {entity_type}::{entity_id}")))
    }

    async fn delete_entity(
        &self,
        application_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> StoreResult<()> {
        let key = (
            application_id.to_string(),
            entity_type.to_string(),
            entity_id.to_string(),
        );
        self.state.write().await.entities.remove(&key);
        Ok(())
    }

    async fn entities(&self, application_id: &str) -> StoreResult<Vec<EntityRecord>> {
        Ok(self
            .state
            .read()
            .await
            .entities
            .values()
            .filter(|e| e.application_id == application_id)
            .cloned()
            .collect())
    }

    async fn search_entity_ids(&self, application_id: &str, resource_type: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .state
            .read()
            .await
            .entities
            .values()
            .filter(|e| e.application_id == application_id && e.entity_type == resource_type)
            .map(|e| e.entity_id.clone())
            .collect())
    }

    async fn group_memberships(
        &self,
        application_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> StoreResult<Vec<(String, String)>> {
        const MAX_DEPTH: usize = 10;
        let state = self.state.read().await;
        let mut visited = std::collections::HashSet::new();
        let mut frontier = vec![(entity_type.to_string(), entity_id.to_string())];
        let mut result = Vec::new();

        for _ in 0..MAX_DEPTH {
            if frontier.is_empty() {
                break;
            }
            let mut next_frontier = Vec::new();
            for (t, id) in frontier {
                let key = (application_id.to_string(), t.clone(), id.clone());
                if let Some(entity) = state.entities.get(&key) {
                    for parent in &entity.parents {
                        let parent_key = (parent.parent_type.clone(), parent.parent_id.clone());
                        if visited.insert(parent_key.clone()) {
                            result.push(parent_key.clone());
                            next_frontier.push(parent_key);
                        }
                    }
                }
            }
            frontier = next_frontier;
        }
        Ok(result)
    }

    async fn upsert_schema(&self, schema: Schema) -> StoreResult<Schema> {
        let mut state = self.state.write().await;
        if schema.is_active {
            for s in state.schemas.values_mut() {
                if s.application_id == schema.application_id {
                    s.is_active = false;
                }
            }
        }
        state.schemas.insert(schema.id.clone(), schema.clone());
        Ok(schema)
    }

    async fn active_schema(&self, application_id: &str) -> StoreResult<Option<Schema>> {
        Ok(self
            .state
            .read()
            .await
            .schemas
            .values()
            .find(|s| s.application_id == application_id && s.is_active)
            .cloned())
    }

    async fn append_audit(&self, record: AuditRecord) -> StoreResult<AuditRecord> {
        self.state.write().await.audit.push(record.clone());
        Ok(record)
    }

    async fn list_audit(&self, application_id: &str, limit: usize) -> StoreResult<Vec<AuditRecord>> {
        let state = self.state.read().await;
        Ok(state
            .audit
            .iter()
            .rev()
            .filter(|r| r.application_id.as_deref() == Some(application_id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_cluster_auth_config(&self) -> StoreResult<ClusterAuthConfig> {
        Ok(self
            .state
            .read()
            .await
            .cluster_auth_config
            .clone()
            .unwrap_or_default())
    }

    async fn put_cluster_auth_config(&self, config: ClusterAuthConfig) -> StoreResult<ClusterAuthConfig> {
        self.state.write().await.cluster_auth_config = Some(config.clone());
        Ok(config)
    }

    async fn create_backend_instance(&self, instance: BackendInstance) -> StoreResult<BackendInstance> {
        let mut state = self.state.write().await;
        state
            .backend_instances
            .insert(instance.instance_id.clone(), instance.clone());
        Ok(instance)
    }

    async fn get_backend_instance(&self, instance_id: &str) -> StoreResult<BackendInstance> {
        self.state
            .read()
            .await
            .backend_instances
            .get(instance_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("backend instance {instance_id}")))
    }

    async fn list_backend_instances(&self, status: Option<BackendStatus>) -> StoreResult<Vec<BackendInstance>> {
        Ok(self
            .state
            .read()
            .await
            .backend_instances
            .values()
            .filter(|i| status.map(|s| i.status == s).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn transition_backend_instance(
        &self,
        instance_id: &str,
        next: BackendStatus,
    ) -> StoreResult<BackendInstance> {
        let mut state = self.state.write().await;
        let instance = state
            .backend_instances
            .get_mut(instance_id)
            .ok_or_else(|| StoreError::NotFound(format!("backend instance {instance_id}")))?;
        if !instance.status.can_transition_to(next) {
            return Err(StoreError::Conflict(format!(
                "cannot transition backend {instance_id} from {:?} to {next:?}",
                instance.status
            )));
        }
        instance.status = next;
        Ok(instance.clone())
    }

    async fn record_backend_heartbeat(&self, instance_id: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if let Some(instance) = state.backend_instances.get_mut(instance_id) {
            instance.last_heartbeat_at = Some(time::OffsetDateTime::now_utc());
        }
        Ok(())
    }
}

/// A non-persistent `Bus` backed by a `HashMap` for key/value data and a
/// `tokio::sync::broadcast` channel for pub/sub — enough to exercise the
/// cache invalidation path and the change broker in tests without a real
/// Redis instance.
pub struct InMemoryBus {
    kv: RwLock<HashMap<String, Vec<u8>>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBus {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            kv: RwLock::new(HashMap::new()),
            events,
        }
    }
}

#[async_trait]
impl Bus for InMemoryBus {
    async fn get(&self, key: &str) -> BusResult<Option<Vec<u8>>> {
        Ok(self.kv.read().await.get(key).cloned())
    }

    async fn set_ttl(&self, key: &str, value: Vec<u8>, _ttl_secs: u64) -> BusResult<()> {
        self.kv.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn del(&self, key: &str) -> BusResult<()> {
        self.kv.write().await.remove(key);
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> BusResult<Vec<String>> {
        Ok(self
            .kv
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn publish(&self, event: ChangeEvent) -> BusResult<()> {
        // No subscribers is not an error: best-effort fan-out.
        let _ = self.events.send(event);
        Ok(())
    }

    async fn subscribe(&self) -> BusResult<BoxStream<'static, ChangeEvent>> {
        let rx = self.events.subscribe();
        let stream = tokio_stream::wrappers::BroadcastStream::new(rx)
            .filter_map(|item| async move { item.ok() });
        Ok(Box::pin(stream))
    }
}

fn _assert_send_sync(_: Arc<InMemoryStore>, _: Arc<InMemoryBus>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::PolicyVersionStatus;

    fn sample_version(policy_id: &str, version: u32, active: bool, status: PolicyVersionStatus) -> PolicyVersion {
        PolicyVersion {
            id: format!("{policy_id}-v{version}"),
            policy_id: policy_id.to_string(),
            version,
            policy_text: "permit(principal, action, resource);".to_string(),
            is_active: active,
            status,
            approver: None,
            approved_at: None,
            created_at: time::OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn activating_a_version_deactivates_siblings() {
        let store = InMemoryStore::new();
        store
            .upsert_policy_version(sample_version("p1", 1, true, PolicyVersionStatus::Approved))
            .await
            .unwrap();
        store
            .upsert_policy_version(sample_version("p1", 2, false, PolicyVersionStatus::Approved))
            .await
            .unwrap();

        store.activate_policy_version("p1-v2").await.unwrap();

        let v1 = store.get_policy_version("p1-v1").await.unwrap();
        let v2 = store.get_policy_version("p1-v2").await.unwrap();
        assert!(!v1.is_active);
        assert!(v2.is_active);
    }

    #[tokio::test]
    async fn activating_a_non_approved_version_is_a_conflict() {
        let store = InMemoryStore::new();
        store
            .upsert_policy_version(sample_version("p1", 1, false, PolicyVersionStatus::Draft))
            .await
            .unwrap();

        let err = store.activate_policy_version("p1-v1").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn group_memberships_terminates_on_cycles() {
        use kernel::ParentRef;
        let store = InMemoryStore::new();
        let mut a = EntityRecord {
            id: "a".into(),
            application_id: "app".into(),
            entity_type: "Group".into(),
            entity_id: "a".into(),
            attributes: HashMap::new(),
            parents: vec![ParentRef { parent_type: "Group".into(), parent_id: "b".into() }],
            created_at: time::OffsetDateTime::now_utc(),
            updated_at: time::OffsetDateTime::now_utc(),
        };
        let b = EntityRecord {
            parents: vec![ParentRef { parent_type: "Group".into(), parent_id: "a".into() }],
            entity_id: "b".into(),
            id: "b".into(),
            ..a.clone()
        };
        a.entity_id = "a".into();
        store.upsert_entity(a).await.unwrap();
        store.upsert_entity(b).await.unwrap();

        let memberships = store.group_memberships("app", "Group", "a").await.unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0], ("Group".to_string(), "b".to_string()));
    }

    #[tokio::test]
    async fn bus_roundtrips_key_value_and_publish() {
        let bus = InMemoryBus::new();
        bus.set_ttl("k", b"v".to_vec(), 5).await.unwrap();
        assert_eq!(bus.get("k").await.unwrap(), Some(b"v".to_vec()));

        let mut stream = bus.subscribe().await.unwrap();
        bus.publish(ChangeEvent::policy_updated("app-1", "p1")).await.unwrap();
        let event = futures::StreamExt::next(&mut stream).await.unwrap();
        assert_eq!(event.application_id.as_deref(), Some("app-1"));
    }
}
