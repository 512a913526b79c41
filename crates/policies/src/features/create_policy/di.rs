use std::sync::Arc;

use kernel::Store;

use super::adapter::StoreCreatePolicyPort;
use super::use_case::CreatePolicyUseCase;

pub type ProductionContainer = Arc<CreatePolicyUseCase<StoreCreatePolicyPort>>;

pub fn create_production_container(store: Arc<dyn Store>) -> ProductionContainer {
    Arc::new(CreatePolicyUseCase::new(StoreCreatePolicyPort::new(store)))
}
