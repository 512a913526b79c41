//! `Authorize` vertical slice: `POST /authorize` and the `Check`/`BatchCheck`
//! gRPC RPCs share this use case.

mod adapter;
mod di;
mod dto;
mod error;
#[cfg(test)]
mod mocks;
mod ports;
mod use_case;

pub use adapter::EngineAuthorizationPort;
pub use di::{create_production_container, AuthorizeContainer, ProductionContainer};
pub use dto::{AuthorizeCommand, AuthorizeResultDto};
pub use error::AuthorizeError;
pub use ports::AuthorizationPort;
pub use use_case::AuthorizeUseCase;

#[cfg(test)]
mod tests {
    use super::mocks::MockAuthorizationPort;
    use super::*;
    use crate::engine::EntityRef;

    #[tokio::test]
    async fn allow_decision_carries_cache_source() {
        let use_case = AuthorizeUseCase::new(MockAuthorizationPort::allow());
        let command = AuthorizeCommand {
            application_id: "app-1".to_string(),
            principal: EntityRef::new("User", "alice"),
            action: EntityRef::new("Action", "view"),
            resource: EntityRef::new("Document", "demo-doc"),
            context: serde_json::json!({}),
        };
        let result = use_case.execute(command).await.unwrap();
        assert_eq!(result.decision, crate::engine::Decision::Allow);
        assert_eq!(result.cache_source, "DB");
    }

    #[tokio::test]
    async fn deny_decision_has_no_reasons() {
        let use_case = AuthorizeUseCase::new(MockAuthorizationPort::deny());
        let command = AuthorizeCommand {
            application_id: "app-1".to_string(),
            principal: EntityRef::new("User", "bob"),
            action: EntityRef::new("Action", "view"),
            resource: EntityRef::new("Document", "demo-doc"),
            context: serde_json::json!({}),
        };
        let result = use_case.execute(command).await.unwrap();
        assert_eq!(result.decision, crate::engine::Decision::Deny);
        assert!(result.reasons.is_empty());
    }

    #[tokio::test]
    async fn engine_error_propagates_as_use_case_error() {
        let use_case = AuthorizeUseCase::new(MockAuthorizationPort::failing("boom"));
        let command = AuthorizeCommand {
            application_id: "app-1".to_string(),
            principal: EntityRef::new("User", "alice"),
            action: EntityRef::new("Action", "view"),
            resource: EntityRef::new("Document", "demo-doc"),
            context: serde_json::json!({}),
        };
        assert!(use_case.execute(command).await.is_err());
    }
}
