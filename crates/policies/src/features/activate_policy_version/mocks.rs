use async_trait::async_trait;
use kernel::{PolicyVersion, PolicyVersionStatus, StoreError};

use super::error::ActivatePolicyVersionError;
use super::ports::ActivatePolicyVersionPort;

pub enum MockBehavior {
    Activated(PolicyVersion),
    Conflict(String),
}

pub struct MockActivatePolicyVersionPort {
    behavior: MockBehavior,
}

impl MockActivatePolicyVersionPort {
    pub fn activating(version_id: &str, policy_id: &str, version: u32) -> Self {
        Self {
            behavior: MockBehavior::Activated(PolicyVersion {
                id: version_id.to_string(),
                policy_id: policy_id.to_string(),
                version,
                policy_text: r#"permit(principal, action, resource);"#.to_string(),
                is_active: true,
                status: PolicyVersionStatus::Approved,
                approver: Some("admin".to_string()),
                approved_at: None,
                created_at: time::OffsetDateTime::UNIX_EPOCH,
            }),
        }
    }

    pub fn conflicting(message: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Conflict(message.into()),
        }
    }
}

#[async_trait]
impl ActivatePolicyVersionPort for MockActivatePolicyVersionPort {
    async fn activate(
        &self,
        _application_id: &str,
        _version_id: &str,
    ) -> Result<PolicyVersion, ActivatePolicyVersionError> {
        match &self.behavior {
            MockBehavior::Activated(version) => Ok(version.clone()),
            MockBehavior::Conflict(message) => Err(StoreError::Conflict(message.clone()).into()),
        }
    }
}
