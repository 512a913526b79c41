use std::sync::Arc;

use crate::entitlement::EntitlementResolver;

use super::adapter::ResolverLookupResourcesPort;
use super::use_case::LookupResourcesUseCase;

pub type ProductionContainer = Arc<LookupResourcesUseCase<ResolverLookupResourcesPort>>;

pub fn create_production_container(resolver: Arc<EntitlementResolver>) -> ProductionContainer {
    Arc::new(LookupResourcesUseCase::new(ResolverLookupResourcesPort::new(resolver)))
}
