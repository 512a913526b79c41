use serde::{Deserialize, Serialize};

use crate::engine::EntityRef;
use crate::projector::{Effect, PermissionEntry};

/// Wire-level input for `GET /apps/{id}/permissions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPermissionsCommand {
    pub application_id: String,
    pub principal: EntityRef,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectDto {
    Permit,
    Forbid,
}

impl From<Effect> for EffectDto {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::Permit => EffectDto::Permit,
            Effect::Forbid => EffectDto::Forbid,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionEntryDto {
    pub policy_id: String,
    pub effect: EffectDto,
    pub actions: Vec<String>,
    pub resource_types: Vec<String>,
    pub resource_ids: Option<Vec<String>>,
    pub conditions: Option<String>,
}

impl From<PermissionEntry> for PermissionEntryDto {
    fn from(entry: PermissionEntry) -> Self {
        Self {
            policy_id: entry.policy_id,
            effect: entry.effect.into(),
            actions: entry.actions,
            resource_types: entry.resource_types,
            resource_ids: entry.resource_ids,
            conditions: entry.conditions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListPermissionsResultDto {
    pub permissions: Vec<PermissionEntryDto>,
    pub effective_actions: Vec<String>,
    pub cache_source: String,
}
