use thiserror::Error;

use kernel::StoreError;

#[derive(Debug, Error)]
pub enum UpsertEntityError {
    #[error("invalid attribute value: {0}")]
    InvalidAttribute(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
