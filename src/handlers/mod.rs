//! REST surface: one module per resource group, assembled into the
//! `/api/v1` router by [`build_router`]. Health and SSE are exempt from
//! both auth and rate limiting; cluster status reads are exempt from
//! rate limiting only.

pub mod authorize;
pub mod cluster;
pub mod entities;
pub mod health;
pub mod lookup_resources;
pub mod permissions;
pub mod policies;
pub mod sse;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::{middleware as axum_middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa_swagger_ui::SwaggerUi;

use crate::app_state::AppState;
use crate::config::Config;
use crate::middleware::{authenticate_and_throttle, MiddlewareDeps};
use crate::openapi::create_api_doc;
use crate::rate_limit::RateLimiter;

/// Builds the full Axum router: health, `/api/v1` resource routes behind
/// auth+rate-limit, the unauthenticated SSE stream, and the Swagger UI.
pub fn build_router(app_state: AppState, config: &Config) -> Router {
    let middleware_deps = MiddlewareDeps {
        auth: config.auth.clone(),
        limiter: Arc::new(RateLimiter::new(config.rate_limit.clone())),
        require_auth: config.auth.mode != "none",
    };

    let guarded = api_v1_routes()
        .with_state(app_state.clone())
        .layer(axum_middleware::from_fn_with_state(middleware_deps, authenticate_and_throttle));

    let exempt = Router::new()
        .route("/events", get(sse::events))
        .route("/cluster/instances", get(cluster::list_instances))
        .with_state(app_state);

    let cors = build_cors_layer(&config.cors.allowed_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::health_check))
        .route("/health/live", get(health::health_check))
        .merge(exempt)
        .nest("/api/v1", guarded)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", create_api_doc()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
        .layer(cors)
}

fn build_cors_layer(allowed_origins: &str) -> CorsLayer {
    if allowed_origins.trim() == "*" {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }

    let origins: Vec<axum::http::HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/authorize", post(authorize::authorize))
        .route("/apps/{id}/lookup-resources", post(lookup_resources::lookup_resources))
        .route("/apps/{id}/permissions", get(permissions::list_permissions))
        .route("/apps/{id}/policies", post(policies::create_policy))
        .route(
            "/apps/{id}/policies/{pid}/versions/{v}/activate",
            post(policies::activate_policy_version),
        )
        .route("/apps/{id}/entities", get(entities::list_entities))
        .route("/apps/{id}/entities", post(entities::upsert_entity))
        .route("/cluster/backends", get(cluster::list_backends))
        .route("/cluster/backends", post(cluster::register_backend))
        .route("/cluster/backends/{instance_id}/approve", post(cluster::approve_backend))
        .route("/cluster/backends/{instance_id}/reject", post(cluster::reject_backend))
        .route("/cluster/backends/{instance_id}/suspend", post(cluster::suspend_backend))
        .route("/cluster/backends/{instance_id}/unsuspend", post(cluster::unsuspend_backend))
}
