use async_trait::async_trait;
use hodei_cache::CacheSource;

use crate::entitlement::{EntitlementError, LookupResourcesRequest};

use super::ports::LookupResourcesPort;

pub struct MockLookupResourcesPort {
    ids: Vec<String>,
}

impl MockLookupResourcesPort {
    pub fn returning(ids: Vec<String>) -> Self {
        Self { ids }
    }
}

#[async_trait]
impl LookupResourcesPort for MockLookupResourcesPort {
    async fn lookup_resources(
        &self,
        _request: &LookupResourcesRequest,
    ) -> Result<(Vec<String>, CacheSource), EntitlementError> {
        Ok((self.ids.clone(), CacheSource::Db))
    }
}
