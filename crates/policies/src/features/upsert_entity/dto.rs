use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Wire-level input for `POST /apps/{id}/entities`: replaces the entity's
/// attributes and parent set atomically.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertEntityCommand {
    pub application_id: String,
    pub entity_type: String,
    pub entity_id: String,
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub parents: Vec<ParentRefDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParentRefDto {
    pub parent_type: String,
    pub parent_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpsertEntityResultDto {
    pub entity_type: String,
    pub entity_id: String,
}
