use async_trait::async_trait;
use kernel::PolicyVersion;

use super::error::ActivatePolicyVersionError;

/// Activates a policy version and propagates the resulting cache
/// invalidation and change notification. Implemented in production by
/// `StoreActivatePolicyVersionPort`; mocked in tests.
#[async_trait]
pub trait ActivatePolicyVersionPort: Send + Sync {
    async fn activate(
        &self,
        application_id: &str,
        version_id: &str,
    ) -> Result<PolicyVersion, ActivatePolicyVersionError>;
}
