use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kernel::Bus;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);
const INSTANCE_TTL_SECS: u64 = 30;
const INSTANCE_KEY_PREFIX: &str = "instance:";

/// The liveness blob a node publishes on every heartbeat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStatus {
    pub instance_id: String,
    pub uptime_secs: u64,
    pub cedar_version: String,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub sse_subscribers: u64,
    pub request_count: u64,
    pub reported_at: OffsetDateTime,
}

fn instance_key(instance_id: &str) -> String {
    format!("{INSTANCE_KEY_PREFIX}{instance_id}")
}

/// Non-authoritative liveness view of the fleet. Each process heartbeats
/// its own `NodeStatus` to the bus every 10s with a 30s TTL — three missed
/// heartbeats evict a node from `list_instances`.
pub struct ClusterRegistry {
    instance_id: String,
    bus: Arc<dyn Bus>,
    cedar_version: String,
    started_at: OffsetDateTime,
    request_count: Arc<AtomicU64>,
    sse_subscribers: Arc<AtomicU64>,
}

impl ClusterRegistry {
    pub fn new(instance_id: impl Into<String>, bus: Arc<dyn Bus>, cedar_version: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            instance_id: instance_id.into(),
            bus,
            cedar_version: cedar_version.into(),
            started_at: OffsetDateTime::now_utc(),
            request_count: Arc::new(AtomicU64::new(0)),
            sse_subscribers: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn record_request(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_sse_subscribers(&self) {
        self.sse_subscribers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement_sse_subscribers(&self) {
        self.sse_subscribers.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |count| Some(count.saturating_sub(1))).ok();
    }

    /// Spawns the periodic heartbeat task; runs for the lifetime of the
    /// process.
    pub fn spawn_heartbeat(self: &Arc<Self>) {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
            loop {
                ticker.tick().await;
                registry.heartbeat_once().await;
            }
        });
    }

    async fn heartbeat_once(&self) {
        let status = NodeStatus {
            instance_id: self.instance_id.clone(),
            uptime_secs: (OffsetDateTime::now_utc() - self.started_at).whole_seconds().max(0) as u64,
            cedar_version: self.cedar_version.clone(),
            cache_hits: 0,
            cache_misses: 0,
            sse_subscribers: self.sse_subscribers.load(Ordering::Relaxed),
            request_count: self.request_count.load(Ordering::Relaxed),
            reported_at: OffsetDateTime::now_utc(),
        };
        match serde_json::to_vec(&status) {
            Ok(bytes) => {
                if let Err(err) = self
                    .bus
                    .set_ttl(&instance_key(&self.instance_id), bytes, INSTANCE_TTL_SECS)
                    .await
                {
                    tracing::warn!(instance_id = %self.instance_id, error = %err, "heartbeat write failed");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize node status"),
        }
    }

    /// Best-effort delete of this node's liveness key on shutdown.
    pub async fn deregister(&self) {
        if let Err(err) = self.bus.del(&instance_key(&self.instance_id)).await {
            tracing::warn!(instance_id = %self.instance_id, error = %err, "failed to deregister instance");
        }
    }

    /// Scans `instance:*` and decodes every live node-status blob.
    pub async fn list_instances(&self) -> Vec<NodeStatus> {
        let keys = match self.bus.scan_prefix(INSTANCE_KEY_PREFIX).await {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(error = %err, "failed to scan instance keys");
                return Vec::new();
            }
        };

        let mut instances = Vec::with_capacity(keys.len());
        for key in keys {
            match self.bus.get(&key).await {
                Ok(Some(bytes)) => match serde_json::from_slice::<NodeStatus>(&bytes) {
                    Ok(status) => instances.push(status),
                    Err(err) => tracing::warn!(key, error = %err, "malformed node status blob"),
                },
                Ok(None) => {}
                Err(err) => tracing::warn!(key, error = %err, "failed to read instance key"),
            }
        }
        instances
    }
}
