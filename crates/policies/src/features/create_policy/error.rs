use thiserror::Error;

use kernel::StoreError;

#[derive(Debug, Error)]
pub enum CreatePolicyError {
    #[error("policy text does not parse as Cedar: {reason}")]
    PolicySyntax { reason: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}
