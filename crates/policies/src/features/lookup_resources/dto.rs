use serde::{Deserialize, Serialize};

use crate::engine::EntityRef;

/// Wire-level input for the `LookupResources` RPC / REST surface.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResourcesCommand {
    pub application_id: String,
    pub principal: EntityRef,
    pub action: EntityRef,
    pub resource_type: String,
    #[serde(default)]
    pub context: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupResourcesResultDto {
    pub resource_ids: Vec<String>,
    pub cache_source: String,
}
