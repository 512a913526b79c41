use async_trait::async_trait;
use kernel::EntityRecord;

use super::error::UpsertEntityError;

/// Persists an entity and propagates the resulting cache invalidation and
/// change notification. Implemented in production by
/// `StoreUpsertEntityPort`; mocked in tests.
#[async_trait]
pub trait UpsertEntityPort: Send + Sync {
    async fn upsert(&self, record: EntityRecord) -> Result<EntityRecord, UpsertEntityError>;
}
