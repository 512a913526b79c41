use std::sync::Arc;

use async_trait::async_trait;
use hodei_cache::CacheSource;

use crate::entitlement::{EntitlementError, EntitlementResolver, LookupResourcesRequest};

use super::ports::LookupResourcesPort;

pub struct ResolverLookupResourcesPort {
    resolver: Arc<EntitlementResolver>,
}

impl ResolverLookupResourcesPort {
    pub fn new(resolver: Arc<EntitlementResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl LookupResourcesPort for ResolverLookupResourcesPort {
    async fn lookup_resources(
        &self,
        request: &LookupResourcesRequest,
    ) -> Result<(Vec<String>, CacheSource), EntitlementError> {
        self.resolver.lookup_resources(request).await
    }
}
