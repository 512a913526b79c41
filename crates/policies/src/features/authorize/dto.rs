use serde::{Deserialize, Serialize};

use crate::engine::{Decision, EntityRef};

/// Wire-level input for `POST /authorize`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeCommand {
    pub application_id: String,
    pub principal: EntityRef,
    pub action: EntityRef,
    pub resource: EntityRef,
    #[serde(default)]
    pub context: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorizeResultDto {
    pub decision: Decision,
    pub reasons: Vec<String>,
    pub errors: Vec<String>,
    /// Surfaced as the `X-Cache-Source` response header.
    pub cache_source: String,
}
