#![allow(clippy::module_name_repetitions)]
//! Dominio compartido (Shared Kernel) para el ecosistema Hodei.
//!
//! Este módulo expone únicamente los elementos de lenguaje
//! verdaderamente transversales (metadatos de atributos, modelo de
//! dominio del PDP y eventos de cambio). Cualquier crate que necesite
//! describir entidades o políticas debe depender de este módulo en
//! lugar de acoplarse a un bounded context concreto.
//!
//! Principios:
//! - No incluir lógica de negocio específica.
//! - Solo tipos estables y abstracciones.
//! - Evitar introducir dependencias cíclicas (este módulo debe permanecer "en la base").
//!
//! Estructura:
//! - `attributes`: Tipos agnósticos para representar valores de atributos.
//! - `model`: Modelo de dominio del PDP (Policy, PolicyVersion, Entity, etc.).
//! - `change_event`: Eventos de cambio publicados en el bus de invalidación.

pub mod attributes;
pub mod change_event;
pub mod model;

// Re-export de tipos de atributos agnósticos
pub use attributes::AttributeValue;

// Tenant data model and change events for the decision point.
pub use change_event::{ChangeEvent, ChangeKind};
pub use model::{
    Application, AuditRecord, BackendInstance, BackendStatus, ClusterAuthConfig, ClusterAuthMode,
    EntityRecord, Namespace, ParentRef, Policy as PolicyRecord, PolicyVersion, PolicyVersionStatus,
    Schema, StoredAttribute,
};
