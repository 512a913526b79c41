use super::dto::{ListPermissionsCommand, ListPermissionsResultDto};
use super::error::ListPermissionsError;
use super::ports::{ListPermissionsPort, ListPermissionsRequest};

pub struct ListPermissionsUseCase<P: ListPermissionsPort> {
    port: P,
}

impl<P: ListPermissionsPort> ListPermissionsUseCase<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    #[tracing::instrument(name = "list_permissions_use_case", skip(self, command), fields(application_id = %command.application_id))]
    pub async fn execute(
        &self,
        command: ListPermissionsCommand,
    ) -> Result<ListPermissionsResultDto, ListPermissionsError> {
        let request = ListPermissionsRequest {
            application_id: command.application_id,
            principal: command.principal,
        };

        let (projection, source) = self.port.list_permissions(&request).await?;

        Ok(ListPermissionsResultDto {
            permissions: projection.permissions.into_iter().map(Into::into).collect(),
            effective_actions: projection.effective_actions,
            cache_source: source.to_string(),
        })
    }
}
