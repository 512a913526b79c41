//! Cluster backend admission state machine: register, approve, and the
//! illegal transitions the spec forbids (re-approving an already-approved
//! node, approving a rejected one).

mod common;

use hodei_cluster::RegisterRequest;
use kernel::BackendStatus;

fn register_request(instance_id: &str) -> RegisterRequest {
    RegisterRequest {
        instance_id: instance_id.to_string(),
        hostname: "node-1.local".to_string(),
        ip_address: Some("10.0.0.5".to_string()),
        csr_pem: None,
        metadata: Default::default(),
        cedar_version: "4.5.1".to_string(),
        os: "linux".to_string(),
        arch: "x86_64".to_string(),
    }
}

#[tokio::test]
async fn a_freshly_registered_backend_is_pending_by_default() {
    // Arrange
    let state = common::bootstrapped_state().await;

    // Act
    let instance = state
        .backend_admission
        .register(register_request("node-1"))
        .await
        .unwrap();

    // Assert
    assert_eq!(instance.status, BackendStatus::Pending);
}

#[tokio::test]
async fn approving_a_pending_backend_marks_it_approved() {
    // Arrange
    let state = common::bootstrapped_state().await;
    state.backend_admission.register(register_request("node-2")).await.unwrap();

    // Act
    let instance = state.backend_admission.approve("node-2", "admin@example.com").await.unwrap();

    // Assert
    assert_eq!(instance.status, BackendStatus::Approved);
    assert_eq!(instance.approved_by.as_deref(), Some("admin@example.com"));
}

#[tokio::test]
async fn approving_an_already_approved_backend_conflicts() {
    // Arrange
    let state = common::bootstrapped_state().await;
    state.backend_admission.register(register_request("node-3")).await.unwrap();
    state.backend_admission.approve("node-3", "admin@example.com").await.unwrap();

    // Act
    let result = state.backend_admission.approve("node-3", "admin@example.com").await;

    // Assert
    assert!(result.is_err());
}

#[tokio::test]
async fn a_rejected_backend_can_never_be_approved() {
    // Arrange
    let state = common::bootstrapped_state().await;
    state.backend_admission.register(register_request("node-4")).await.unwrap();
    state.backend_admission.reject("node-4", "admin@example.com", "untrusted host").await.unwrap();

    // Act
    let result = state.backend_admission.approve("node-4", "admin@example.com").await;

    // Assert
    assert!(result.is_err());
}

#[tokio::test]
async fn an_approved_backend_can_be_suspended_then_unsuspended() {
    // Arrange
    let state = common::bootstrapped_state().await;
    state.backend_admission.register(register_request("node-5")).await.unwrap();
    state.backend_admission.approve("node-5", "admin@example.com").await.unwrap();

    // Act
    let suspended = state.backend_admission.suspend("node-5").await.unwrap();
    let unsuspended = state.backend_admission.unsuspend("node-5").await.unwrap();

    // Assert
    assert_eq!(suspended.status, BackendStatus::Suspended);
    assert_eq!(unsuspended.status, BackendStatus::Approved);
}
