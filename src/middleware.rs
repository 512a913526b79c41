//! Auth + rate-limit middleware shared by every mutating and read REST
//! route. Applied as a single `from_fn_with_state` layer so a rejected
//! request never reaches the rate limiter's bookkeeping twice.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::{authenticate, CallerIdentity};
use crate::error::ApiError;
use crate::rate_limit::RateLimiter;

/// Resolves the caller's identity and enforces the per-caller rate limit.
/// `AppState` carries the auth config via `bootstrap`'s closure over
/// `Config`, so this takes the limiter as separate middleware state built
/// alongside `AppState` in `main`.
pub async fn authenticate_and_throttle(
    State(deps): State<MiddlewareDeps>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client_ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .unwrap_or("unknown")
        .to_string();

    let (mut parts, body) = request.into_parts();
    let identity = authenticate(&deps.auth, &parts, &client_ip, deps.require_auth)?;

    if !deps.limiter.check(identity.rate_limit_key()) {
        return Err(ApiError::RateLimited);
    }

    parts.extensions.insert(identity);
    request = Request::from_parts(parts, body);

    Ok(next.run(request).await)
}

/// State for [`authenticate_and_throttle`], separate from `AppState` since
/// it needs the raw `AuthConfig` and a limiter instance rather than ports.
#[derive(Clone)]
pub struct MiddlewareDeps {
    pub auth: crate::config::AuthConfig,
    pub limiter: Arc<RateLimiter>,
    pub require_auth: bool,
}

pub use CallerIdentity as RequestCallerIdentity;
