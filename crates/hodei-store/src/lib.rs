//! Reference `Store` and `Bus` implementations.
//!
//! `mem` (default) provides in-memory test doubles suitable for unit tests
//! and the embedded single-node deployment mode; `surreal` provides the
//! production-grade `Store` backed by SurrealDB, mirroring the teacher's
//! `SurrealMemStorage`/`embedded_storage` adapters. The in-memory `Bus`
//! double is always available; a Redis-backed `Bus` is provided for
//! production deployments where a real shared cache/pub-sub is required.

pub mod memory;
pub mod redis_bus;

#[cfg(feature = "surreal")]
pub mod surreal;

pub use memory::{InMemoryBus, InMemoryStore};
pub use redis_bus::RedisBus;
