use std::sync::Arc;

use crate::providers::{EntityProvider, PolicyProvider};

use super::adapter::ProjectingListPermissionsPort;
use super::use_case::ListPermissionsUseCase;

pub type ProductionContainer = Arc<ListPermissionsUseCase<ProjectingListPermissionsPort>>;

pub fn create_production_container(
    policy_provider: Arc<dyn PolicyProvider>,
    entity_provider: Arc<dyn EntityProvider>,
) -> ProductionContainer {
    Arc::new(ListPermissionsUseCase::new(ProjectingListPermissionsPort::new(
        policy_provider,
        entity_provider,
    )))
}
