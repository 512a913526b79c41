use serde::{Deserialize, Serialize};

/// Wire-level input for `POST /apps/{id}/policies/{pid}/versions/{v}/activate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivatePolicyVersionCommand {
    pub application_id: String,
    pub version_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivatePolicyVersionResultDto {
    pub version_id: String,
    pub policy_id: String,
    pub version: u32,
}
