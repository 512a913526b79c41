use std::sync::Arc;

use async_trait::async_trait;
use hodei_cache::CacheSource;

use crate::engine::{AuthorizationRequest, AuthorizationResult, DecisionEngine, EngineError};

use super::ports::AuthorizationPort;

/// Production adapter: delegates straight to the shared `DecisionEngine`.
pub struct EngineAuthorizationPort {
    engine: Arc<DecisionEngine>,
}

impl EngineAuthorizationPort {
    pub fn new(engine: Arc<DecisionEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl AuthorizationPort for EngineAuthorizationPort {
    async fn authorize(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<(AuthorizationResult, CacheSource), EngineError> {
        self.engine.authorize(request).await
    }
}
