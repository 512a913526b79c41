//! Tenant-scoped aggregates shared across the PDP.
//!
//! These types are the agnostic, persistence-agnostic shapes of the data
//! model described for the decision point: namespaces group applications,
//! applications own policies/entities/schemas, and policies carry an
//! append-only history of versions with at most one active version.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;

/// Groups applications under a single administrative boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A tenant: owns policies, entities, schemas and audit records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    pub name: String,
    pub namespace_id: String,
    pub description: Option<String>,
    pub approval_required: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub soft_deleted_at: Option<OffsetDateTime>,
}

impl Application {
    pub fn is_deleted(&self) -> bool {
        self.soft_deleted_at.is_some()
    }
}

/// A named container of `PolicyVersion`s within an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub application_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Lifecycle state of a `PolicyVersion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyVersionStatus {
    Draft,
    PendingApproval,
    Approved,
    Rejected,
}

/// An immutable snapshot of a policy's Cedar text.
///
/// Versions are monotone per policy starting at 1 and are never rewritten;
/// at most one version per policy may have `is_active = true`, and that
/// version's `status` must be `Approved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyVersion {
    pub id: String,
    pub policy_id: String,
    pub version: u32,
    pub policy_text: String,
    pub is_active: bool,
    pub status: PolicyVersionStatus,
    pub approver: Option<String>,
    pub approved_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

impl PolicyVersion {
    /// A version may only be activated once it carries the approved status.
    pub fn can_activate(&self) -> bool {
        self.status == PolicyVersionStatus::Approved
    }
}

/// A persisted attribute value, as stored by an application's entities.
///
/// Mirrors `kernel::domain::AttributeValue` but is `Serialize`-friendly for
/// storage and wire transport without depending on the entity traits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredAttribute {
    Bool(bool),
    Long(i64),
    String(String),
    Set(Vec<StoredAttribute>),
    Record(HashMap<String, StoredAttribute>),
}

/// A reference to a parent entity; parents may point at entities that do
/// not (or not yet) exist locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ParentRef {
    pub parent_type: String,
    pub parent_id: String,
}

/// A persisted entity: `(type, id)` unique per application, with
/// attributes and parent edges owned atomically by the entity row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    pub application_id: String,
    pub entity_type: String,
    pub entity_id: String,
    pub attributes: HashMap<String, StoredAttribute>,
    pub parents: Vec<ParentRef>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl EntityRecord {
    /// The `(type, id)` pair Store implementations must enforce uniqueness on.
    pub fn key(&self) -> (&str, &str) {
        (self.entity_type.as_str(), self.entity_id.as_str())
    }
}

/// An advisory, per-application Cedar schema document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub id: String,
    pub application_id: String,
    pub version: u32,
    pub schema_text: String,
    pub is_active: bool,
}

/// An append-only audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: String,
    pub application_id: Option<String>,
    pub actor: String,
    pub action: String,
    pub target: String,
    pub decision: Option<String>,
    pub context: serde_json::Value,
    pub created_at: OffsetDateTime,
}

/// How cluster members authenticate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterAuthMode {
    None,
    SharedSecret,
    Mtls,
}

/// Cluster-wide peer-authentication configuration, including the managed CA
/// used to sign backend instance certificates under mTLS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterAuthConfig {
    pub auth_mode: ClusterAuthMode,
    pub shared_secret_hash: Option<String>,
    pub ca_cert_pem: Option<String>,
    pub ca_private_key_pem: Option<String>,
    pub ca_fingerprint: Option<String>,
    pub ca_not_before: Option<OffsetDateTime>,
    pub ca_not_after: Option<OffsetDateTime>,
    pub approval_required: bool,
}

impl Default for ClusterAuthConfig {
    fn default() -> Self {
        Self {
            auth_mode: ClusterAuthMode::None,
            shared_secret_hash: None,
            ca_cert_pem: None,
            ca_private_key_pem: None,
            ca_fingerprint: None,
            ca_not_before: None,
            ca_not_after: None,
            approval_required: true,
        }
    }
}

/// Admission state of a `BackendInstance`.
///
/// Allowed transitions: `Pending -> Approved`, `Pending -> Rejected`,
/// `Approved <-> Suspended`, and `* -> Deleted`. `Rejected` and `Deleted`
/// are terminal and accept no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
    Deleted,
}

impl BackendStatus {
    /// Whether `self -> next` is an allowed admission transition.
    pub fn can_transition_to(self, next: BackendStatus) -> bool {
        use BackendStatus::*;
        match (self, next) {
            (_, Deleted) => true,
            (Pending, Approved) | (Pending, Rejected) => true,
            (Approved, Suspended) | (Suspended, Approved) => true,
            _ => false,
        }
    }
}

/// A single node applying for (or admitted into) the cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendInstance {
    pub instance_id: String,
    pub hostname: String,
    pub ip_address: Option<String>,
    pub status: BackendStatus,
    pub cert_fingerprint: Option<String>,
    pub csr_pem: Option<String>,
    pub signed_cert_pem: Option<String>,
    pub metadata: HashMap<String, String>,
    pub last_heartbeat_at: Option<OffsetDateTime>,
    pub requested_at: OffsetDateTime,
    pub approved_at: Option<OffsetDateTime>,
    pub approved_by: Option<String>,
    pub rejected_at: Option<OffsetDateTime>,
    pub rejected_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub cedar_version: String,
    pub os: String,
    pub arch: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_status_allows_pending_to_approved() {
        assert!(BackendStatus::Pending.can_transition_to(BackendStatus::Approved));
        assert!(BackendStatus::Pending.can_transition_to(BackendStatus::Rejected));
    }

    #[test]
    fn backend_status_allows_suspend_round_trip() {
        assert!(BackendStatus::Approved.can_transition_to(BackendStatus::Suspended));
        assert!(BackendStatus::Suspended.can_transition_to(BackendStatus::Approved));
    }

    #[test]
    fn backend_status_rejects_terminal_outgoing() {
        assert!(!BackendStatus::Rejected.can_transition_to(BackendStatus::Approved));
        assert!(!BackendStatus::Deleted.can_transition_to(BackendStatus::Approved));
    }

    #[test]
    fn backend_status_any_state_can_be_deleted() {
        for s in [
            BackendStatus::Pending,
            BackendStatus::Approved,
            BackendStatus::Suspended,
        ] {
            assert!(s.can_transition_to(BackendStatus::Deleted));
        }
    }

    #[test]
    fn policy_version_requires_approved_status_to_activate() {
        let mut v = PolicyVersion {
            id: "v1".into(),
            policy_id: "p1".into(),
            version: 1,
            policy_text: "permit(principal, action, resource);".into(),
            is_active: false,
            status: PolicyVersionStatus::Draft,
            approver: None,
            approved_at: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        assert!(!v.can_activate());
        v.status = PolicyVersionStatus::Approved;
        assert!(v.can_activate());
    }
}
