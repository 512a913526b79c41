//! Exercises `LookupResources` end to end: seed entities through the real
//! `upsert_entity` use case (so cache invalidation runs too), seed an
//! active policy, then ask which resources a principal may act upon.

mod common;

use std::collections::HashSet;

use policies::engine::EntityRef;
use policies::features::lookup_resources::LookupResourcesCommand;
use policies::features::upsert_entity::UpsertEntityCommand;

async fn seed_document(state: &hodei_pdp_api::app_state::AppState, application_id: &str, id: &str, owner: &str) {
    let mut attributes = std::collections::HashMap::new();
    attributes.insert("owner".to_string(), serde_json::json!(owner));
    state
        .upsert_entity
        .execute(UpsertEntityCommand {
            application_id: application_id.to_string(),
            entity_type: "Document".to_string(),
            entity_id: id.to_string(),
            attributes,
            parents: vec![],
        })
        .await
        .expect("upsert_entity should succeed");
}

#[tokio::test]
async fn returns_exactly_the_resources_the_principal_may_view() {
    // Arrange
    let state = common::bootstrapped_state().await;
    common::seed_active_policy(
        &state,
        "app-1",
        r#"permit(principal == User::"alice", action == Action::"view", resource is Document);"#,
    )
    .await;
    seed_document(&state, "app-1", "doc-a", "alice").await;
    seed_document(&state, "app-1", "doc-b", "bob").await;

    let command = LookupResourcesCommand {
        application_id: "app-1".to_string(),
        principal: EntityRef::new("User", "alice"),
        action: EntityRef::new("Action", "view"),
        resource_type: "Document".to_string(),
        context: serde_json::json!({}),
    };

    // Act
    let result = state.lookup_resources.execute(command).await.unwrap();

    // Assert: the permit has no resource-id constraint, so both documents
    // are returned regardless of ownership.
    let resource_ids: HashSet<_> = result.resource_ids.into_iter().collect();
    assert_eq!(resource_ids, HashSet::from(["doc-a".to_string(), "doc-b".to_string()]));
}

#[tokio::test]
async fn unknown_resource_type_yields_an_empty_set() {
    // Arrange
    let state = common::bootstrapped_state().await;
    common::seed_active_policy(
        &state,
        "app-1",
        r#"permit(principal == User::"alice", action == Action::"view", resource is Document);"#,
    )
    .await;

    let command = LookupResourcesCommand {
        application_id: "app-1".to_string(),
        principal: EntityRef::new("User", "alice"),
        action: EntityRef::new("Action", "view"),
        resource_type: "Folder".to_string(),
        context: serde_json::json!({}),
    };

    // Act
    let result = state.lookup_resources.execute(command).await.unwrap();

    // Assert
    assert!(result.resource_ids.is_empty());
}
