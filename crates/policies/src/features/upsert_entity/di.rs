use std::sync::Arc;

use hodei_broker::ChangeBroker;
use kernel::Store;

use crate::providers::CachingProvider;

use super::adapter::StoreUpsertEntityPort;
use super::use_case::UpsertEntityUseCase;

pub type ProductionContainer = Arc<UpsertEntityUseCase<StoreUpsertEntityPort>>;

pub fn create_production_container(
    store: Arc<dyn Store>,
    cache: Arc<CachingProvider>,
    broker: Arc<ChangeBroker>,
) -> ProductionContainer {
    Arc::new(UpsertEntityUseCase::new(StoreUpsertEntityPort::new(store, cache, broker)))
}
