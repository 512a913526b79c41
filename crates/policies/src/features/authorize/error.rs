use thiserror::Error;

use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum AuthorizeError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
