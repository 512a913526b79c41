use serde::{Deserialize, Serialize};

/// Wire-level input for `POST /apps/{id}/policies`: creates the policy
/// record and its first (draft) version in one call.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePolicyCommand {
    pub application_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub policy_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePolicyResultDto {
    pub policy_id: String,
    pub version_id: String,
    pub version: u32,
    pub status: String,
}
