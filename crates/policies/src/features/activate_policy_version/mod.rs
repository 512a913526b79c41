//! `ActivatePolicyVersion` vertical slice:
//! `POST /apps/{id}/policies/{pid}/versions/{v}/activate`.

mod adapter;
mod di;
mod dto;
mod error;
#[cfg(test)]
mod mocks;
mod ports;
mod use_case;

pub use adapter::StoreActivatePolicyVersionPort;
pub use di::{create_production_container, ProductionContainer};
pub use dto::{ActivatePolicyVersionCommand, ActivatePolicyVersionResultDto};
pub use error::ActivatePolicyVersionError;
pub use ports::ActivatePolicyVersionPort;
pub use use_case::ActivatePolicyVersionUseCase;

#[cfg(test)]
mod tests {
    use super::mocks::MockActivatePolicyVersionPort;
    use super::*;

    fn command() -> ActivatePolicyVersionCommand {
        ActivatePolicyVersionCommand {
            application_id: "app-1".to_string(),
            version_id: "v1".to_string(),
        }
    }

    #[tokio::test]
    async fn activation_returns_the_new_active_version() {
        let use_case = ActivatePolicyVersionUseCase::new(MockActivatePolicyVersionPort::activating(
            "v1", "p1", 2,
        ));
        let result = use_case.execute(command()).await.unwrap();
        assert_eq!(result.version_id, "v1");
        assert_eq!(result.policy_id, "p1");
        assert_eq!(result.version, 2);
    }

    #[tokio::test]
    async fn conflict_on_non_approved_version_propagates() {
        let use_case =
            ActivatePolicyVersionUseCase::new(MockActivatePolicyVersionPort::conflicting("not approved"));
        let err = use_case.execute(command()).await.unwrap_err();
        assert!(matches!(err, ActivatePolicyVersionError::Store(_)));
    }
}
