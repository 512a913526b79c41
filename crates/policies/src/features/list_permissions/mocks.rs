use async_trait::async_trait;
use hodei_cache::CacheSource;

use crate::projector::Projection;

use super::error::ListPermissionsError;
use super::ports::{ListPermissionsPort, ListPermissionsRequest};

pub struct MockListPermissionsPort {
    projection: Projection,
}

impl MockListPermissionsPort {
    pub fn returning(projection: Projection) -> Self {
        Self { projection }
    }
}

#[async_trait]
impl ListPermissionsPort for MockListPermissionsPort {
    async fn list_permissions(
        &self,
        _request: &ListPermissionsRequest,
    ) -> Result<(Projection, CacheSource), ListPermissionsError> {
        Ok((self.projection.clone(), CacheSource::Db))
    }
}
