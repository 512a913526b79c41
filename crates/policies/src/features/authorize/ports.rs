use async_trait::async_trait;
use hodei_cache::CacheSource;

use crate::engine::{AuthorizationRequest, AuthorizationResult, EngineError};

/// Evaluates one authorization request. Implemented in production by
/// `DecisionEngine::authorize`; mocked in tests.
#[async_trait]
pub trait AuthorizationPort: Send + Sync {
    async fn authorize(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<(AuthorizationResult, CacheSource), EngineError>;
}
