use std::sync::Arc;

use async_trait::async_trait;
use kernel::{PolicyRecord, PolicyVersion, Store, StoreError};

use super::ports::CreatePolicyPort;

pub struct StoreCreatePolicyPort {
    store: Arc<dyn Store>,
}

impl StoreCreatePolicyPort {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CreatePolicyPort for StoreCreatePolicyPort {
    async fn create_policy(&self, policy: PolicyRecord) -> Result<PolicyRecord, StoreError> {
        self.store.create_policy(policy).await
    }

    async fn upsert_policy_version(&self, version: PolicyVersion) -> Result<PolicyVersion, StoreError> {
        self.store.upsert_policy_version(version).await
    }
}
