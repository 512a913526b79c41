use async_trait::async_trait;
use kernel::{PolicyRecord, PolicyVersion, StoreError};

/// Persists a policy and its versions. Implemented in production by
/// `StoreCreatePolicyPort`, which delegates straight to `Store`; mocked in
/// tests.
#[async_trait]
pub trait CreatePolicyPort: Send + Sync {
    async fn create_policy(&self, policy: PolicyRecord) -> Result<PolicyRecord, StoreError>;
    async fn upsert_policy_version(&self, version: PolicyVersion) -> Result<PolicyVersion, StoreError>;
}
