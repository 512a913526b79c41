use crate::entitlement::LookupResourcesRequest;

use super::dto::{LookupResourcesCommand, LookupResourcesResultDto};
use super::error::LookupResourcesError;
use super::ports::LookupResourcesPort;

pub struct LookupResourcesUseCase<P: LookupResourcesPort> {
    port: P,
}

impl<P: LookupResourcesPort> LookupResourcesUseCase<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    #[tracing::instrument(name = "lookup_resources_use_case", skip(self, command), fields(application_id = %command.application_id))]
    pub async fn execute(
        &self,
        command: LookupResourcesCommand,
    ) -> Result<LookupResourcesResultDto, LookupResourcesError> {
        let request = LookupResourcesRequest {
            application_id: command.application_id,
            principal: command.principal,
            action: command.action,
            resource_type: command.resource_type,
            context: command.context,
        };

        let (resource_ids, source) = self.port.lookup_resources(&request).await?;

        Ok(LookupResourcesResultDto {
            resource_ids,
            cache_source: source.to_string(),
        })
    }
}
