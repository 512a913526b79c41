//! Event shapes fanned out by the change broker and consumed by the cache's
//! invalidation subscriber and by SSE clients.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The kind of state change a `ChangeEvent` announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    PolicyUpdated,
    EntityUpdated,
    BackendApproved,
    BackendRejected,
    BackendSuspended,
    BackendUnsuspended,
    Connected,
    Heartbeat,
}

/// A single change notification, published on the `Bus` and fanned out by
/// `ChangeBroker` to every subscriber (cache invalidation, SSE clients).
///
/// `application_id` is `None` for cluster-wide events (`BackendApproved` and
/// friends, `Connected`, `Heartbeat`); it is always `Some` for
/// `PolicyUpdated`/`EntityUpdated`, which are scoped to one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub application_id: Option<String>,
    /// Policy id, entity id, or backend instance id, depending on `kind`.
    pub subject_id: String,
    pub occurred_at: OffsetDateTime,
}

impl ChangeEvent {
    pub fn policy_updated(application_id: impl Into<String>, policy_id: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::PolicyUpdated,
            application_id: Some(application_id.into()),
            subject_id: policy_id.into(),
            occurred_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn entity_updated(application_id: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::EntityUpdated,
            application_id: Some(application_id.into()),
            subject_id: entity_id.into(),
            occurred_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn backend(kind: ChangeKind, instance_id: impl Into<String>) -> Self {
        debug_assert!(matches!(
            kind,
            ChangeKind::BackendApproved
                | ChangeKind::BackendRejected
                | ChangeKind::BackendSuspended
                | ChangeKind::BackendUnsuspended
        ));
        Self {
            kind,
            application_id: None,
            subject_id: instance_id.into(),
            occurred_at: OffsetDateTime::now_utc(),
        }
    }

    /// Whether this event invalidates cached decisions for `application_id`.
    pub fn invalidates(&self, application_id: &str) -> bool {
        match self.kind {
            ChangeKind::PolicyUpdated | ChangeKind::EntityUpdated => {
                self.application_id.as_deref() == Some(application_id)
            }
            _ => false,
        }
    }
}
