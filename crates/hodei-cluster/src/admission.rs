use std::collections::HashMap;
use std::sync::Arc;

use kernel::{BackendInstance, BackendStatus, ChangeEvent, ChangeKind, Store, StoreError};
use thiserror::Error;
use time::OffsetDateTime;

use crate::ca::{sign_csr, CaError};

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ca(#[from] CaError),
}

pub struct RegisterRequest {
    pub instance_id: String,
    pub hostname: String,
    pub ip_address: Option<String>,
    pub csr_pem: Option<String>,
    pub metadata: HashMap<String, String>,
    pub cedar_version: String,
    pub os: String,
    pub arch: String,
}

/// The authoritative, Store-backed approval state machine for cluster
/// backends. Every transition goes through `BackendStatus::can_transition_to`
/// so illegal jumps (e.g. re-approving a rejected node) are rejected before
/// ever reaching the store.
pub struct BackendAdmission {
    store: Arc<dyn Store>,
    broker_publish: Box<dyn Fn(ChangeEvent) + Send + Sync>,
}

impl BackendAdmission {
    pub fn new(store: Arc<dyn Store>, broker_publish: impl Fn(ChangeEvent) + Send + Sync + 'static) -> Self {
        Self {
            store,
            broker_publish: Box::new(broker_publish),
        }
    }

    /// Implements the spec's `Register` semantics: update-in-place for a
    /// known instance, or insert-as-pending (auto-approving when the
    /// cluster's `approvalRequired` flag is false) for a new one.
    pub async fn register(&self, req: RegisterRequest) -> Result<BackendInstance, AdmissionError> {
        match self.store.get_backend_instance(&req.instance_id).await {
            Ok(mut existing) => {
                existing.hostname = req.hostname;
                existing.ip_address = req.ip_address;
                existing.csr_pem = req.csr_pem;
                existing.metadata = req.metadata;
                existing.cedar_version = req.cedar_version;
                existing.os = req.os;
                existing.arch = req.arch;
                existing.last_heartbeat_at = Some(OffsetDateTime::now_utc());
                self.store.record_backend_heartbeat(&existing.instance_id).await?;
                Ok(self.store.create_backend_instance(existing).await?)
            }
            Err(StoreError::NotFound(_)) => {
                let config = self.store.get_cluster_auth_config().await.unwrap_or_default();
                let now = OffsetDateTime::now_utc();
                let mut instance = BackendInstance {
                    instance_id: req.instance_id,
                    hostname: req.hostname,
                    ip_address: req.ip_address,
                    status: BackendStatus::Pending,
                    cert_fingerprint: None,
                    csr_pem: req.csr_pem,
                    signed_cert_pem: None,
                    metadata: req.metadata,
                    last_heartbeat_at: Some(now),
                    requested_at: now,
                    approved_at: None,
                    approved_by: None,
                    rejected_at: None,
                    rejected_by: None,
                    rejection_reason: None,
                    cedar_version: req.cedar_version,
                    os: req.os,
                    arch: req.arch,
                };
                if !config.approval_required {
                    instance.status = BackendStatus::Approved;
                    instance.approved_at = Some(now);
                    instance.approved_by = Some("auto-approved".to_string());
                }
                Ok(self.store.create_backend_instance(instance).await?)
            }
            Err(other) => Err(other.into()),
        }
    }

    pub async fn approve(&self, instance_id: &str, approver: &str) -> Result<BackendInstance, AdmissionError> {
        let instance = self.store.get_backend_instance(instance_id).await?;
        self.ensure_transition(instance.status, BackendStatus::Approved)?;

        // Sign the CSR before persisting the `Approved` transition: if
        // signing fails the record must remain `pending`, not flip to
        // `approved` with no cert.
        let signed_cert_pem = if let Some(csr_pem) = instance.csr_pem.clone() {
            let config = self.store.get_cluster_auth_config().await?;
            if let (Some(ca_cert), Some(ca_key)) = (&config.ca_cert_pem, &config.ca_private_key_pem) {
                Some(sign_csr(&csr_pem, ca_cert, ca_key)?)
            } else {
                None
            }
        } else {
            None
        };

        let mut instance = self
            .store
            .transition_backend_instance(instance_id, BackendStatus::Approved)
            .await?;
        instance.approved_at = Some(OffsetDateTime::now_utc());
        instance.approved_by = Some(approver.to_string());
        instance.signed_cert_pem = signed_cert_pem;

        let instance = self.store.create_backend_instance(instance).await?;
        (self.broker_publish)(ChangeEvent::backend(ChangeKind::BackendApproved, instance_id));
        Ok(instance)
    }

    pub async fn reject(&self, instance_id: &str, rejector: &str, reason: &str) -> Result<BackendInstance, AdmissionError> {
        let instance = self.store.get_backend_instance(instance_id).await?;
        self.ensure_transition(instance.status, BackendStatus::Rejected)?;

        let mut instance = self
            .store
            .transition_backend_instance(instance_id, BackendStatus::Rejected)
            .await?;
        instance.rejected_at = Some(OffsetDateTime::now_utc());
        instance.rejected_by = Some(rejector.to_string());
        instance.rejection_reason = Some(reason.to_string());
        let instance = self.store.create_backend_instance(instance).await?;

        (self.broker_publish)(ChangeEvent::backend(ChangeKind::BackendRejected, instance_id));
        Ok(instance)
    }

    pub async fn suspend(&self, instance_id: &str) -> Result<BackendInstance, AdmissionError> {
        self.transition_simple(instance_id, BackendStatus::Suspended, ChangeKind::BackendSuspended)
            .await
    }

    pub async fn unsuspend(&self, instance_id: &str) -> Result<BackendInstance, AdmissionError> {
        self.transition_simple(instance_id, BackendStatus::Approved, ChangeKind::BackendUnsuspended)
            .await
    }

    async fn transition_simple(
        &self,
        instance_id: &str,
        next: BackendStatus,
        event_kind: ChangeKind,
    ) -> Result<BackendInstance, AdmissionError> {
        let instance = self.store.get_backend_instance(instance_id).await?;
        self.ensure_transition(instance.status, next)?;
        let instance = self.store.transition_backend_instance(instance_id, next).await?;
        (self.broker_publish)(ChangeEvent::backend(event_kind, instance_id));
        Ok(instance)
    }

    fn ensure_transition(&self, current: BackendStatus, next: BackendStatus) -> Result<(), AdmissionError> {
        if current.can_transition_to(next) {
            Ok(())
        } else {
            Err(AdmissionError::Conflict(format!(
                "cannot transition backend from {current:?} to {next:?}"
            )))
        }
    }

    pub async fn list(&self, status: Option<BackendStatus>) -> Result<Vec<BackendInstance>, AdmissionError> {
        Ok(self.store.list_backend_instances(status).await?)
    }
}
