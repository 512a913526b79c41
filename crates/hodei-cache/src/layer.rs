use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use kernel::{Bus, ChangeEvent};
use moka::future::Cache;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::provenance::CacheSource;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("{0}")]
    Loader(String),
}

/// Tunables for a `CacheLayer`. Defaults match the spec's TTL₁/TTL₂ of 5s.
#[derive(Debug, Clone, Copy)]
pub struct CacheLayerConfig {
    pub l1_ttl: Duration,
    pub l1_max_entries: u64,
    pub l2_ttl_secs: u64,
}

impl Default for CacheLayerConfig {
    fn default() -> Self {
        Self {
            l1_ttl: Duration::from_secs(5),
            l1_max_entries: 10_000,
            l2_ttl_secs: 5,
        }
    }
}

pub fn policies_key(application_id: &str) -> String {
    format!("policies:{application_id}")
}

pub fn entities_key(application_id: &str) -> String {
    format!("entities:{application_id}")
}

/// A two-tier cache for one serializable value type (active policy lists,
/// entity sets). L1 lives in-process via `moka`; L2 lives on the shared
/// `Bus`. Bus errors are logged and treated as a miss — they never fail a
/// request, matching the spec's "Bus is best-effort" contract.
pub struct CacheLayer<V> {
    l1: Cache<String, V>,
    bus: Arc<dyn Bus>,
    l2_ttl_secs: u64,
}

impl<V> CacheLayer<V>
where
    V: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    pub fn new(bus: Arc<dyn Bus>, config: CacheLayerConfig) -> Self {
        let l1 = Cache::builder()
            .max_capacity(config.l1_max_entries)
            .time_to_live(config.l1_ttl)
            .build();
        Self {
            l1,
            bus,
            l2_ttl_secs: config.l2_ttl_secs,
        }
    }

    /// Implements the spec's three-step lookup algorithm: L1, then L2, then
    /// `loader`. A populated L2 hit backfills L1; a `loader` hit backfills
    /// both tiers, the L2 write happening fire-and-forget.
    pub async fn get_or_load<F, Fut>(
        &self,
        key: &str,
        loader: F,
    ) -> Result<(V, CacheSource), CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, CacheError>>,
    {
        if let Some(value) = self.l1.get(key).await {
            return Ok((value, CacheSource::L1));
        }

        match self.bus.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<V>(&bytes) {
                Ok(value) => {
                    self.l1.insert(key.to_string(), value.clone()).await;
                    return Ok((value, CacheSource::L2));
                }
                Err(err) => {
                    tracing::warn!(key, error = %err, "malformed L2 cache payload, falling through to loader");
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(key, error = %err, "bus unavailable on cache read, falling through to loader");
            }
        }

        let value = loader().await?;
        self.l1.insert(key.to_string(), value.clone()).await;
        self.spawn_l2_write(key.to_string(), &value);
        Ok((value, CacheSource::Db))
    }

    fn spawn_l2_write(&self, key: String, value: &V) {
        let bus = self.bus.clone();
        let ttl = self.l2_ttl_secs;
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                tokio::spawn(async move {
                    if let Err(err) = bus.set_ttl(&key, bytes, ttl).await {
                        tracing::warn!(key, error = %err, "failed to populate L2 cache");
                    }
                });
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to serialize value for L2 cache");
            }
        }
    }

    /// Drops `key` from L1 only. Used by the invalidation subscriber, which
    /// never needs to re-delete L2 (the publisher already did).
    pub async fn evict_local(&self, key: &str) {
        self.l1.invalidate(key).await;
    }

    /// Full invalidation path for an application: drop both local keys,
    /// delete the corresponding L2 keys, and publish the change event so
    /// every other node's L1 drops its copies too.
    pub async fn invalidate(&self, application_id: &str, event: ChangeEvent) {
        let pkey = policies_key(application_id);
        let ekey = entities_key(application_id);
        self.l1.invalidate(&pkey).await;
        self.l1.invalidate(&ekey).await;

        if let Err(err) = self.bus.del(&pkey).await {
            tracing::warn!(key = %pkey, error = %err, "failed to delete L2 key on invalidation");
        }
        if let Err(err) = self.bus.del(&ekey).await {
            tracing::warn!(key = %ekey, error = %err, "failed to delete L2 key on invalidation");
        }
        if let Err(err) = self.bus.publish(event).await {
            tracing::warn!(application_id, error = %err, "failed to publish invalidation event");
        }
    }
}
