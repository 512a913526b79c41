use crate::engine::AuthorizationRequest;

use super::dto::{AuthorizeCommand, AuthorizeResultDto};
use super::error::AuthorizeError;
use super::ports::AuthorizationPort;

/// Orchestrates a single `Authorize` call: builds the engine request from
/// the wire DTO, delegates to the `AuthorizationPort`, and shapes the
/// response DTO including the cache-source header value.
pub struct AuthorizeUseCase<P: AuthorizationPort> {
    port: P,
}

impl<P: AuthorizationPort> AuthorizeUseCase<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    #[tracing::instrument(name = "authorize_use_case", skip(self, command), fields(application_id = %command.application_id))]
    pub async fn execute(&self, command: AuthorizeCommand) -> Result<AuthorizeResultDto, AuthorizeError> {
        let request = AuthorizationRequest {
            application_id: command.application_id,
            principal: command.principal,
            action: command.action,
            resource: command.resource,
            context: command.context,
        };

        let (result, source) = self.port.authorize(&request).await?;

        Ok(AuthorizeResultDto {
            decision: result.decision,
            reasons: result.reasons,
            errors: result.errors,
            cache_source: source.to_string(),
        })
    }
}
