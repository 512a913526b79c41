//! Application state shared across every Axum handler and the gRPC
//! service.
//!
//! Follows the composition-root pattern: `AppState` holds only ports
//! (trait objects) and the few shared infrastructure handles (cluster
//! registry, broker) that handlers need directly for endpoints with no
//! dedicated use case of their own (cluster listing, SSE).

use std::sync::Arc;

use hodei_broker::ChangeBroker;
use hodei_cluster::{BackendAdmission, ClusterRegistry};
use kernel::{Bus, Store};

use policies::features::activate_policy_version;
use policies::features::authorize;
use policies::features::create_policy;
use policies::features::list_permissions;
use policies::features::lookup_resources;
use policies::features::upsert_entity;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub bus: Arc<dyn Bus>,

    pub authorize: authorize::ProductionContainer,
    pub lookup_resources: lookup_resources::ProductionContainer,
    pub list_permissions: list_permissions::ProductionContainer,
    pub create_policy: create_policy::ProductionContainer,
    pub activate_policy_version: activate_policy_version::ProductionContainer,
    pub upsert_entity: upsert_entity::ProductionContainer,

    pub cluster_registry: Arc<ClusterRegistry>,
    pub backend_admission: Arc<BackendAdmission>,
    pub broker: Arc<ChangeBroker>,
}
