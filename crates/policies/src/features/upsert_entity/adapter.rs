use std::sync::Arc;

use async_trait::async_trait;
use hodei_broker::ChangeBroker;
use kernel::{ChangeEvent, EntityRecord, Store};

use crate::providers::CachingProvider;

use super::error::UpsertEntityError;
use super::ports::UpsertEntityPort;

/// Production adapter: writes through to the store, then drops the cached
/// entity set for the application and fans the change out both to peer
/// nodes (via the `Bus`) and to local SSE subscribers (via the
/// `ChangeBroker`).
pub struct StoreUpsertEntityPort {
    store: Arc<dyn Store>,
    cache: Arc<CachingProvider>,
    broker: Arc<ChangeBroker>,
}

impl StoreUpsertEntityPort {
    pub fn new(store: Arc<dyn Store>, cache: Arc<CachingProvider>, broker: Arc<ChangeBroker>) -> Self {
        Self { store, cache, broker }
    }
}

#[async_trait]
impl UpsertEntityPort for StoreUpsertEntityPort {
    async fn upsert(&self, record: EntityRecord) -> Result<EntityRecord, UpsertEntityError> {
        let application_id = record.application_id.clone();
        let subject_id = format!("{}:{}", record.entity_type, record.entity_id);
        let record = self.store.upsert_entity(record).await?;

        let event = ChangeEvent::entity_updated(application_id.clone(), subject_id);
        self.cache.invalidate(&application_id, event.clone()).await;
        self.broker.publish(event);

        Ok(record)
    }
}
