//! Library crate backing the `hodei-pdp-api` binary; exists so the
//! composition root (config, bootstrap, handlers, gRPC service) is
//! reachable from integration tests as well as from `main`.

pub mod app_state;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod grpc;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod rate_limit;
