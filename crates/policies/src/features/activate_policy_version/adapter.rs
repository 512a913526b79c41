use std::sync::Arc;

use async_trait::async_trait;
use hodei_broker::ChangeBroker;
use kernel::{ChangeEvent, PolicyVersion, Store};

use crate::providers::CachingProvider;

use super::error::ActivatePolicyVersionError;
use super::ports::ActivatePolicyVersionPort;

/// Production adapter: activates the version in the store, then drops the
/// cached policy set for the application and fans the change out both to
/// peer nodes (via the `Bus`, through `CachingProvider::invalidate`) and to
/// local SSE subscribers (via the `ChangeBroker`).
pub struct StoreActivatePolicyVersionPort {
    store: Arc<dyn Store>,
    cache: Arc<CachingProvider>,
    broker: Arc<ChangeBroker>,
}

impl StoreActivatePolicyVersionPort {
    pub fn new(store: Arc<dyn Store>, cache: Arc<CachingProvider>, broker: Arc<ChangeBroker>) -> Self {
        Self { store, cache, broker }
    }
}

#[async_trait]
impl ActivatePolicyVersionPort for StoreActivatePolicyVersionPort {
    async fn activate(
        &self,
        application_id: &str,
        version_id: &str,
    ) -> Result<PolicyVersion, ActivatePolicyVersionError> {
        let version = self.store.activate_policy_version(version_id).await?;

        let event = ChangeEvent::policy_updated(application_id, version.policy_id.clone());
        self.cache.invalidate(application_id, event.clone()).await;
        self.broker.publish(event);

        Ok(version)
    }
}
