use async_trait::async_trait;
use hodei_cache::CacheSource;

use crate::engine::EntityRef;
use crate::projector::Projection;

use super::error::ListPermissionsError;

pub struct ListPermissionsRequest {
    pub application_id: String,
    pub principal: EntityRef,
}

/// Projects the active policy set for one principal into a `Projection`.
/// Implemented in production by `ProjectingListPermissionsPort`; mocked in
/// tests.
#[async_trait]
pub trait ListPermissionsPort: Send + Sync {
    async fn list_permissions(
        &self,
        request: &ListPermissionsRequest,
    ) -> Result<(Projection, CacheSource), ListPermissionsError>;
}
