//! `PolicyProvider` / `EntityProvider` capability traits and the caching
//! decorator that composes each over a `Store`-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use hodei_cache::{entities_key, policies_key, CacheError, CacheLayer, CacheSource};
use kernel::{EntityRecord, PolicyVersion, Store, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("cache error: {0}")]
    Cache(String),
}

impl From<CacheError> for ProviderError {
    fn from(err: CacheError) -> Self {
        ProviderError::Cache(err.to_string())
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Loads the active policy set for an application.
#[async_trait]
pub trait PolicyProvider: Send + Sync {
    async fn active_policies(&self, application_id: &str) -> ProviderResult<(Vec<PolicyVersion>, CacheSource)>;
}

/// Loads the entity set for an application, plus queries the decision
/// pipeline builds on top of it (candidate enumeration, group closure).
#[async_trait]
pub trait EntityProvider: Send + Sync {
    async fn entities(&self, application_id: &str) -> ProviderResult<(Vec<EntityRecord>, CacheSource)>;

    async fn search_entity_ids(
        &self,
        application_id: &str,
        resource_type: &str,
    ) -> ProviderResult<Vec<String>>;

    async fn group_memberships(
        &self,
        application_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> ProviderResult<Vec<(String, String)>>;
}

/// Store-backed `PolicyProvider`/`EntityProvider` with no caching; mostly
/// useful for tests and as the innermost loader the caching decorators wrap.
pub struct StoreProvider {
    store: Arc<dyn Store>,
}

impl StoreProvider {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PolicyProvider for StoreProvider {
    async fn active_policies(&self, application_id: &str) -> ProviderResult<(Vec<PolicyVersion>, CacheSource)> {
        let versions = self.store.active_policies(application_id).await?;
        Ok((versions, CacheSource::Db))
    }
}

#[async_trait]
impl EntityProvider for StoreProvider {
    async fn entities(&self, application_id: &str) -> ProviderResult<(Vec<EntityRecord>, CacheSource)> {
        let entities = self.store.entities(application_id).await?;
        Ok((entities, CacheSource::Db))
    }

    async fn search_entity_ids(
        &self,
        application_id: &str,
        resource_type: &str,
    ) -> ProviderResult<Vec<String>> {
        Ok(self.store.search_entity_ids(application_id, resource_type).await?)
    }

    async fn group_memberships(
        &self,
        application_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> ProviderResult<Vec<(String, String)>> {
        Ok(self
            .store
            .group_memberships(application_id, entity_type, entity_id)
            .await?)
    }
}

/// Caching decorator over a `Store`: policy/entity lookups go through the
/// two-tier `CacheLayer`; candidate enumeration and group closure bypass the
/// cache (the spec scopes caching to the two serialized keys only).
pub struct CachingProvider {
    store: Arc<dyn Store>,
    policy_cache: CacheLayer<Vec<PolicyVersion>>,
    entity_cache: CacheLayer<Vec<EntityRecord>>,
}

impl CachingProvider {
    pub fn new(
        store: Arc<dyn Store>,
        policy_cache: CacheLayer<Vec<PolicyVersion>>,
        entity_cache: CacheLayer<Vec<EntityRecord>>,
    ) -> Self {
        Self {
            store,
            policy_cache,
            entity_cache,
        }
    }
}

#[async_trait]
impl PolicyProvider for CachingProvider {
    #[tracing::instrument(skip(self), fields(application_id))]
    async fn active_policies(&self, application_id: &str) -> ProviderResult<(Vec<PolicyVersion>, CacheSource)> {
        let key = policies_key(application_id);
        let store = self.store.clone();
        let application_id = application_id.to_string();
        let (versions, source) = self
            .policy_cache
            .get_or_load(&key, || async move {
                store
                    .active_policies(&application_id)
                    .await
                    .map_err(|err| CacheError::Loader(err.to_string()))
            })
            .await?;
        Ok((versions, source))
    }
}

#[async_trait]
impl EntityProvider for CachingProvider {
    #[tracing::instrument(skip(self), fields(application_id))]
    async fn entities(&self, application_id: &str) -> ProviderResult<(Vec<EntityRecord>, CacheSource)> {
        let key = entities_key(application_id);
        let store = self.store.clone();
        let application_id = application_id.to_string();
        let (entities, source) = self
            .entity_cache
            .get_or_load(&key, || async move {
                store
                    .entities(&application_id)
                    .await
                    .map_err(|err| CacheError::Loader(err.to_string()))
            })
            .await?;
        Ok((entities, source))
    }

    async fn search_entity_ids(
        &self,
        application_id: &str,
        resource_type: &str,
    ) -> ProviderResult<Vec<String>> {
        Ok(self.store.search_entity_ids(application_id, resource_type).await?)
    }

    async fn group_memberships(
        &self,
        application_id: &str,
        entity_type: &str,
        entity_id: &str,
    ) -> ProviderResult<Vec<(String, String)>> {
        Ok(self
            .store
            .group_memberships(application_id, entity_type, entity_id)
            .await?)
    }
}

impl CachingProvider {
    /// Drops both the policy and entity L1/L2 entries for `application_id`
    /// and publishes `event` so peer nodes do the same. `policies_key` and
    /// `entities_key` are invalidated together regardless of which one
    /// changed, since either a policy or an entity mutation can change the
    /// outcome of every future `Authorize` call for the application.
    pub async fn invalidate(&self, application_id: &str, event: kernel::ChangeEvent) {
        self.policy_cache.invalidate(application_id, event).await;
    }
}
