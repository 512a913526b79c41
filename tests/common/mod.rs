//! Shared fixtures for the root-level integration tests: a bootstrapped
//! in-memory `AppState` plus helpers for seeding policies and entities
//! directly through the `Store`, bypassing the REST/gRPC surface.

use hodei_pdp_api::app_state::AppState;
use hodei_pdp_api::bootstrap::bootstrap;
use hodei_pdp_api::config::Config;
use kernel::{Policy as PolicyRecord, PolicyVersion, PolicyVersionStatus};
use uuid::Uuid;

pub async fn bootstrapped_state() -> AppState {
    bootstrap(&Config::default())
        .await
        .expect("bootstrap should succeed with in-memory defaults")
}

/// Creates a policy, seeds one `Approved` version directly (bypassing
/// `create_policy`'s use case, which only ever produces `Draft` versions),
/// activates it, and returns the version's id.
pub async fn seed_active_policy(state: &AppState, application_id: &str, policy_text: &str) -> String {
    let now = time::OffsetDateTime::now_utc();
    let policy_id = Uuid::new_v4().to_string();

    state
        .store
        .create_policy(PolicyRecord {
            id: policy_id.clone(),
            application_id: application_id.to_string(),
            name: "test-policy".to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("create_policy should succeed");

    let version_id = Uuid::new_v4().to_string();
    state
        .store
        .upsert_policy_version(PolicyVersion {
            id: version_id.clone(),
            policy_id: policy_id.clone(),
            version: 1,
            policy_text: policy_text.to_string(),
            is_active: false,
            status: PolicyVersionStatus::Approved,
            approver: Some("test-approver".to_string()),
            approved_at: Some(now),
            created_at: now,
        })
        .await
        .expect("upsert_policy_version should succeed");

    state
        .store
        .activate_policy_version(&version_id)
        .await
        .expect("activating an approved version should succeed");

    version_id
}
