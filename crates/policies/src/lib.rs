//! Cedar-backed decision engine for the Hodei policy decision point.
//!
//! This crate owns the capabilities the PDP's decision path is built from:
//!
//! - [`engine`] — the `DecisionEngine` that evaluates one `Authorize`
//!   request against an application's active policies and entities.
//! - [`providers`] — `PolicyProvider`/`EntityProvider` capability traits and
//!   the caching decorator composing them over a `Store`.
//! - [`entitlement`] — `EntitlementResolver`, candidate-by-candidate
//!   `LookupResources` evaluation.
//! - [`projector`] — `PermissionProjector`, regex-based parsing of active
//!   policy text into permission entries for `ListPermissions`.
//! - [`translate`] — the Cedar translation bridge (kernel domain types to
//!   `cedar_policy` types). Cedar is not exposed outside this crate.
//!
//! Application-facing use cases live under [`features`], one vertical slice
//! per operation (`authorize`, `lookup_resources`, `list_permissions`,
//! `create_policy`, `activate_policy_version`, `upsert_entity`), each
//! following the same `dto`/`error`/`ports`/`use_case`/`mocks`/`di` shape.

pub mod engine;
pub mod entitlement;
pub mod features;
pub mod projector;
pub mod providers;
pub mod translate;
