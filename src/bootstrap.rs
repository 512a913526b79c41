//! Application bootstrap: wires every infrastructure adapter and use case
//! into an `AppState`, in the same numbered-step shape production
//! composition roots in this codebase follow:
//!
//! 1. Infrastructure adapters (store, bus).
//! 2. Shared components (cache layer, providers, decision engine).
//! 3. Use case instantiation via each feature's `create_production_container`.
//! 4. Cluster membership and admission.
//! 5. `AppState` construction.

use std::sync::Arc;
use std::time::Duration;

use hodei_broker::{ChangeBroker, ChangeBrokerConfig};
use hodei_cache::{CacheLayer, CacheLayerConfig};
use hodei_cluster::{BackendAdmission, ClusterRegistry};
use hodei_store::{InMemoryBus, InMemoryStore, RedisBus};
use kernel::{Bus, ChangeEvent, EntityRecord, PolicyVersion, Store};
use policies::engine::DecisionEngine;
use policies::entitlement::EntitlementResolver;
use policies::features::{activate_policy_version, authorize, create_policy, list_permissions, lookup_resources, upsert_entity};
use policies::providers::CachingProvider;

use crate::app_state::AppState;
use crate::config::Config;

const CEDAR_VERSION: &str = "4.5.1";

/// Bootstraps the full application graph from `config`.
pub async fn bootstrap(config: &Config) -> Result<AppState, Box<dyn std::error::Error + Send + Sync>> {
    tracing::info!("initializing persistence adapters");
    let store: Arc<dyn Store> = build_store(config).await?;
    let bus: Arc<dyn Bus> = build_bus(config)?;

    tracing::info!("creating cache layer and providers");
    let cache_config = CacheLayerConfig {
        l1_ttl: Duration::from_secs(config.cache.ttl_secs),
        l1_max_entries: config.cache.l1_max_entries,
        l2_ttl_secs: config.cache.ttl_secs,
    };
    let policy_cache: CacheLayer<Vec<PolicyVersion>> = CacheLayer::new(bus.clone(), cache_config.clone());
    let entity_cache: CacheLayer<Vec<EntityRecord>> = CacheLayer::new(bus.clone(), cache_config);
    let caching_provider = Arc::new(CachingProvider::new(store.clone(), policy_cache, entity_cache));

    let policy_provider: Arc<dyn policies::providers::PolicyProvider> = caching_provider.clone();
    let entity_provider: Arc<dyn policies::providers::EntityProvider> = caching_provider.clone();

    tracing::info!("constructing decision engine and entitlement resolver");
    let decision_engine = Arc::new(DecisionEngine::new(policy_provider.clone(), entity_provider.clone()));
    let entitlement_resolver = Arc::new(EntitlementResolver::new(policy_provider.clone(), entity_provider.clone()));

    tracing::info!("starting change broker");
    let broker = ChangeBroker::new(ChangeBrokerConfig::default());

    tracing::info!("instantiating use cases");
    let authorize = authorize::create_production_container(decision_engine.clone());
    let lookup_resources = lookup_resources::create_production_container(entitlement_resolver.clone());
    let list_permissions = list_permissions::create_production_container(policy_provider.clone(), entity_provider.clone());
    let create_policy = create_policy::create_production_container(store.clone());
    let activate_policy_version =
        activate_policy_version::create_production_container(store.clone(), caching_provider.clone(), broker.clone());
    let upsert_entity = upsert_entity::create_production_container(store.clone(), caching_provider.clone(), broker.clone());

    tracing::info!("initializing cluster membership and backend admission");
    let instance_id = uuid::Uuid::new_v4().to_string();
    let cluster_registry = ClusterRegistry::new(instance_id, bus.clone(), CEDAR_VERSION);
    cluster_registry.spawn_heartbeat();

    let admission_broker = broker.clone();
    let backend_admission = Arc::new(BackendAdmission::new(store.clone(), move |event: ChangeEvent| {
        admission_broker.publish(event);
    }));

    tracing::info!("bootstrap completed");
    Ok(AppState {
        store,
        bus,
        authorize,
        lookup_resources,
        list_permissions,
        create_policy,
        activate_policy_version,
        upsert_entity,
        cluster_registry,
        backend_admission,
        broker,
    })
}

async fn build_store(config: &Config) -> Result<Arc<dyn Store>, Box<dyn std::error::Error + Send + Sync>> {
    if config.store.url == "memory://" {
        return Ok(Arc::new(InMemoryStore::new()));
    }

    #[cfg(feature = "store-surreal")]
    {
        let store = hodei_store::surreal::SurrealStore::connect(&config.store.url, &config.store.namespace, &config.store.database)
            .await?;
        return Ok(Arc::new(store));
    }

    #[cfg(not(feature = "store-surreal"))]
    {
        Err(format!(
            "store URL '{}' requires the store-surreal feature, which is not enabled",
            config.store.url
        )
        .into())
    }
}

fn build_bus(config: &Config) -> Result<Arc<dyn Bus>, Box<dyn std::error::Error + Send + Sync>> {
    if config.bus.address == "memory://" {
        return Ok(Arc::new(InMemoryBus::new()));
    }
    Ok(Arc::new(RedisBus::new(&config.bus.address)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bootstrap_with_defaults_succeeds() {
        let config = Config::default();
        let result = bootstrap(&config).await;
        assert!(result.is_ok(), "bootstrap should succeed with in-memory defaults");
    }
}
