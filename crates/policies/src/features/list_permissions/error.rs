use thiserror::Error;

use crate::providers::ProviderError;

#[derive(Debug, Error)]
pub enum ListPermissionsError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
