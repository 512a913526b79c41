//! `LookupResources` vertical slice.

mod adapter;
mod di;
mod dto;
mod error;
#[cfg(test)]
mod mocks;
mod ports;
mod use_case;

pub use adapter::ResolverLookupResourcesPort;
pub use di::{create_production_container, ProductionContainer};
pub use dto::{LookupResourcesCommand, LookupResourcesResultDto};
pub use error::LookupResourcesError;
pub use ports::LookupResourcesPort;
pub use use_case::LookupResourcesUseCase;

#[cfg(test)]
mod tests {
    use super::mocks::MockLookupResourcesPort;
    use super::*;
    use crate::engine::EntityRef;

    #[tokio::test]
    async fn returns_resource_ids_from_the_port() {
        let use_case = LookupResourcesUseCase::new(MockLookupResourcesPort::returning(vec![
            "demo-doc".to_string(),
        ]));
        let command = LookupResourcesCommand {
            application_id: "app-1".to_string(),
            principal: EntityRef::new("User", "alice"),
            action: EntityRef::new("Action", "view"),
            resource_type: "Document".to_string(),
            context: serde_json::json!({}),
        };
        let result = use_case.execute(command).await.unwrap();
        assert_eq!(result.resource_ids, vec!["demo-doc".to_string()]);
        assert_eq!(result.cache_source, "DB");
    }
}
