use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hodei_cache::CacheSource;

use crate::engine::{AuthorizationRequest, AuthorizationResult, Decision, EngineError};

use super::ports::AuthorizationPort;

/// Behavior a `MockAuthorizationPort` replays on each call.
pub enum MockBehavior {
    Fixed(AuthorizationResult, CacheSource),
    Error(String),
}

pub struct MockAuthorizationPort {
    behavior: Arc<Mutex<MockBehavior>>,
}

impl MockAuthorizationPort {
    pub fn allow() -> Self {
        Self {
            behavior: Arc::new(Mutex::new(MockBehavior::Fixed(
                AuthorizationResult {
                    decision: Decision::Allow,
                    reasons: vec!["p1".to_string()],
                    errors: vec![],
                },
                CacheSource::Db,
            ))),
        }
    }

    pub fn deny() -> Self {
        Self {
            behavior: Arc::new(Mutex::new(MockBehavior::Fixed(
                AuthorizationResult {
                    decision: Decision::Deny,
                    reasons: vec![],
                    errors: vec![],
                },
                CacheSource::Db,
            ))),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(MockBehavior::Error(message.into()))),
        }
    }
}

#[async_trait]
impl AuthorizationPort for MockAuthorizationPort {
    async fn authorize(
        &self,
        _request: &AuthorizationRequest,
    ) -> Result<(AuthorizationResult, CacheSource), EngineError> {
        match &*self.behavior.lock().unwrap() {
            MockBehavior::Fixed(result, source) => Ok((result.clone(), *source)),
            MockBehavior::Error(message) => Err(EngineError::InvalidRequest(message.clone())),
        }
    }
}
