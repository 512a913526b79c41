//! The `Bus` port: a best-effort shared key/value + pub/sub facility backing
//! the L2 cache tier, cluster heartbeats and change-event fan-out.
//!
//! `Bus` is explicitly best-effort: callers must not treat a publish or a
//! key write as durable, and a `Bus` failure must never fail an
//! authorization decision — callers degrade to L1-only / Store-only
//! behavior and log a warning instead.

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::domain::change_event::ChangeEvent;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type BusResult<T> = Result<T, BusError>;

/// Shared, best-effort key/value + pub/sub backend.
#[async_trait]
pub trait Bus: Send + Sync {
    async fn get(&self, key: &str) -> BusResult<Option<Vec<u8>>>;

    /// Sets `key` to `value`, expiring after `ttl_secs` seconds (0 = no expiry).
    async fn set_ttl(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> BusResult<()>;

    async fn del(&self, key: &str) -> BusResult<()>;

    /// Lists keys starting with `prefix`, e.g. `instance:` for cluster
    /// liveness scans. Returns an empty vector rather than erroring when the
    /// backend cannot support key enumeration cheaply.
    async fn scan_prefix(&self, prefix: &str) -> BusResult<Vec<String>>;

    async fn publish(&self, event: ChangeEvent) -> BusResult<()>;

    /// A live stream of change events; implementations that cannot support
    /// server push return an immediately-empty stream rather than erroring,
    /// since subscription loss must degrade gracefully.
    async fn subscribe(&self) -> BusResult<BoxStream<'static, ChangeEvent>>;
}
