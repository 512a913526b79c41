use cedar_policy::Policy as CedarPolicy;
use kernel::{PolicyRecord, PolicyVersion, PolicyVersionStatus};
use uuid::Uuid;

use super::dto::{CreatePolicyCommand, CreatePolicyResultDto};
use super::error::CreatePolicyError;
use super::ports::CreatePolicyPort;

pub struct CreatePolicyUseCase<P: CreatePolicyPort> {
    port: P,
}

impl<P: CreatePolicyPort> CreatePolicyUseCase<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    #[tracing::instrument(name = "create_policy_use_case", skip(self, command), fields(application_id = %command.application_id))]
    pub async fn execute(&self, command: CreatePolicyCommand) -> Result<CreatePolicyResultDto, CreatePolicyError> {
        let policy_id = Uuid::new_v4().to_string();

        CedarPolicy::parse(Some(policy_id.clone().into()), &command.policy_text)
            .map_err(|err| CreatePolicyError::PolicySyntax { reason: err.to_string() })?;

        let now = time::OffsetDateTime::now_utc();
        let policy = PolicyRecord {
            id: policy_id.clone(),
            application_id: command.application_id,
            name: command.name,
            description: command.description,
            created_at: now,
            updated_at: now,
        };
        let policy = self.port.create_policy(policy).await?;

        let version = PolicyVersion {
            id: Uuid::new_v4().to_string(),
            policy_id: policy.id.clone(),
            version: 1,
            policy_text: command.policy_text,
            is_active: false,
            status: PolicyVersionStatus::Draft,
            approver: None,
            approved_at: None,
            created_at: now,
        };
        let version = self.port.upsert_policy_version(version).await?;

        tracing::info!(policy_id = %policy.id, version_id = %version.id, "created draft policy version");

        Ok(CreatePolicyResultDto {
            policy_id: policy.id,
            version_id: version.id,
            version: version.version,
            status: "draft".to_string(),
        })
    }
}
