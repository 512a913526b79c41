use std::sync::Arc;

use async_trait::async_trait;
use hodei_cache::CacheSource;

use crate::projector::{PermissionProjector, Projection};
use crate::providers::{EntityProvider, PolicyProvider};

use super::error::ListPermissionsError;
use super::ports::{ListPermissionsPort, ListPermissionsRequest};

/// Production adapter: loads the active policy set and the principal's
/// group closure, then runs the `PermissionProjector` over them.
pub struct ProjectingListPermissionsPort {
    policy_provider: Arc<dyn PolicyProvider>,
    entity_provider: Arc<dyn EntityProvider>,
}

impl ProjectingListPermissionsPort {
    pub fn new(policy_provider: Arc<dyn PolicyProvider>, entity_provider: Arc<dyn EntityProvider>) -> Self {
        Self {
            policy_provider,
            entity_provider,
        }
    }
}

#[async_trait]
impl ListPermissionsPort for ProjectingListPermissionsPort {
    async fn list_permissions(
        &self,
        request: &ListPermissionsRequest,
    ) -> Result<(Projection, CacheSource), ListPermissionsError> {
        let (versions, source) = self.policy_provider.active_policies(&request.application_id).await?;
        let group_ids = self
            .entity_provider
            .group_memberships(
                &request.application_id,
                &request.principal.entity_type,
                &request.principal.id,
            )
            .await?;

        let projector = PermissionProjector;
        let projection = projector.project(&versions, &request.principal, &group_ids);
        Ok((projection, source))
    }
}
