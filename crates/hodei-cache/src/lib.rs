//! Two-tier cache in front of the policy/entity providers: an in-process
//! (L1) tier backed by a shared (L2) tier on the `Bus`, with pub/sub
//! invalidation so every node in the fleet drops stale entries together.

mod invalidation;
mod layer;
mod provenance;

pub use invalidation::InvalidationSubscriber;
pub use layer::{entities_key, policies_key, CacheError, CacheLayer, CacheLayerConfig};
pub use provenance::CacheSource;
