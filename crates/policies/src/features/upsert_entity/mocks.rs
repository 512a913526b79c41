use async_trait::async_trait;
use kernel::EntityRecord;

use super::error::UpsertEntityError;
use super::ports::UpsertEntityPort;

pub struct MockUpsertEntityPort;

#[async_trait]
impl UpsertEntityPort for MockUpsertEntityPort {
    async fn upsert(&self, record: EntityRecord) -> Result<EntityRecord, UpsertEntityError> {
        Ok(record)
    }
}
