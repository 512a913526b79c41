use std::sync::Arc;

use futures::StreamExt;
use kernel::{Bus, ChangeKind};

use crate::layer::{entities_key, policies_key};

/// Subscribes to the `Bus`'s change-event stream for the lifetime of the
/// process and evicts the local L1 entries named by each incoming
/// `policy_updated`/`entity_updated` event. L2 deletion is already the
/// publisher's responsibility, so this task only ever touches L1.
pub struct InvalidationSubscriber;

impl InvalidationSubscriber {
    /// Spawns the subscriber loop on the current tokio runtime. Returns
    /// immediately; the task runs until the bus stream ends.
    pub fn spawn<P, E>(bus: Arc<dyn Bus>, policy_cache: Arc<P>, entity_cache: Arc<E>)
    where
        P: LocalEvict + Send + Sync + 'static,
        E: LocalEvict + Send + Sync + 'static,
    {
        tokio::spawn(async move {
            let mut stream = match bus.subscribe().await {
                Ok(stream) => stream,
                Err(err) => {
                    tracing::warn!(error = %err, "invalidation subscriber failed to attach to bus");
                    return;
                }
            };

            while let Some(event) = stream.next().await {
                let Some(app_id) = event.application_id.as_deref() else {
                    continue;
                };
                match event.kind {
                    ChangeKind::PolicyUpdated => {
                        policy_cache.evict(&policies_key(app_id)).await;
                    }
                    ChangeKind::EntityUpdated => {
                        entity_cache.evict(&entities_key(app_id)).await;
                    }
                    _ => {}
                }
            }
        });
    }
}

/// Minimal surface the subscriber needs from a `CacheLayer<V>`, so it can
/// stay generic over both the policy and entity cache instances.
#[async_trait::async_trait]
pub trait LocalEvict {
    async fn evict(&self, key: &str);
}

#[async_trait::async_trait]
impl<V> LocalEvict for crate::layer::CacheLayer<V>
where
    V: Clone + Send + Sync + serde::Serialize + serde::de::DeserializeOwned + 'static,
{
    async fn evict(&self, key: &str) {
        self.evict_local(key).await;
    }
}
