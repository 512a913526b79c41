use std::sync::Arc;

use hodei_broker::ChangeBroker;
use kernel::Store;

use crate::providers::CachingProvider;

use super::adapter::StoreActivatePolicyVersionPort;
use super::use_case::ActivatePolicyVersionUseCase;

pub type ProductionContainer = Arc<ActivatePolicyVersionUseCase<StoreActivatePolicyVersionPort>>;

pub fn create_production_container(
    store: Arc<dyn Store>,
    cache: Arc<CachingProvider>,
    broker: Arc<ChangeBroker>,
) -> ProductionContainer {
    Arc::new(ActivatePolicyVersionUseCase::new(StoreActivatePolicyVersionPort::new(
        store, cache, broker,
    )))
}
