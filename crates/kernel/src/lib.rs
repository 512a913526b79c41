// crates/kernel/src/lib.rs

pub mod application;
pub mod domain;

// Re-export application ports for ergonomic use
pub use application::{Bus, BusError, Store, StoreError};

// Re-export shared domain (kernel) symbols
pub use domain::{
    Application, AttributeValue, AuditRecord, BackendInstance, BackendStatus, ChangeEvent,
    ChangeKind, ClusterAuthConfig, ClusterAuthMode, EntityRecord, Namespace, ParentRef,
    PolicyRecord, PolicyVersion, PolicyVersionStatus, Schema, StoredAttribute,
};
