use super::dto::{ActivatePolicyVersionCommand, ActivatePolicyVersionResultDto};
use super::error::ActivatePolicyVersionError;
use super::ports::ActivatePolicyVersionPort;

pub struct ActivatePolicyVersionUseCase<P: ActivatePolicyVersionPort> {
    port: P,
}

impl<P: ActivatePolicyVersionPort> ActivatePolicyVersionUseCase<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    #[tracing::instrument(name = "activate_policy_version_use_case", skip(self, command), fields(application_id = %command.application_id, version_id = %command.version_id))]
    pub async fn execute(
        &self,
        command: ActivatePolicyVersionCommand,
    ) -> Result<ActivatePolicyVersionResultDto, ActivatePolicyVersionError> {
        let version = self
            .port
            .activate(&command.application_id, &command.version_id)
            .await?;

        tracing::info!(policy_id = %version.policy_id, version = version.version, "activated policy version");

        Ok(ActivatePolicyVersionResultDto {
            version_id: version.id,
            policy_id: version.policy_id,
            version: version.version,
        })
    }
}
