use thiserror::Error;

use kernel::StoreError;

#[derive(Debug, Error)]
pub enum ActivatePolicyVersionError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
