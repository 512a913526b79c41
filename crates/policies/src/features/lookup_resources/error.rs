use thiserror::Error;

use crate::entitlement::EntitlementError;

#[derive(Debug, Error)]
pub enum LookupResourcesError {
    #[error(transparent)]
    Resolver(#[from] EntitlementError),
}
