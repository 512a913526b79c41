use std::sync::Mutex;

use async_trait::async_trait;
use kernel::{PolicyRecord, PolicyVersion, StoreError};

use super::ports::CreatePolicyPort;

#[derive(Default)]
pub struct MockCreatePolicyPort {
    fail: Option<String>,
    created: Mutex<Vec<PolicyRecord>>,
    versions: Mutex<Vec<PolicyVersion>>,
}

impl MockCreatePolicyPort {
    pub fn accepting() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail: Some(message.into()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl CreatePolicyPort for MockCreatePolicyPort {
    async fn create_policy(&self, policy: PolicyRecord) -> Result<PolicyRecord, StoreError> {
        if let Some(message) = &self.fail {
            return Err(StoreError::Internal(message.clone()));
        }
        self.created.lock().unwrap().push(policy.clone());
        Ok(policy)
    }

    async fn upsert_policy_version(&self, version: PolicyVersion) -> Result<PolicyVersion, StoreError> {
        self.versions.lock().unwrap().push(version.clone());
        Ok(version)
    }
}
