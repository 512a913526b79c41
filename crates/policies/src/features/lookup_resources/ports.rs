use async_trait::async_trait;
use hodei_cache::CacheSource;

use crate::entitlement::{EntitlementError, LookupResourcesRequest};

#[async_trait]
pub trait LookupResourcesPort: Send + Sync {
    async fn lookup_resources(
        &self,
        request: &LookupResourcesRequest,
    ) -> Result<(Vec<String>, CacheSource), EntitlementError>;
}
