//! `ListPermissions` vertical slice: `GET /apps/{id}/permissions`.

mod adapter;
mod di;
mod dto;
mod error;
#[cfg(test)]
mod mocks;
mod ports;
mod use_case;

pub use adapter::ProjectingListPermissionsPort;
pub use di::{create_production_container, ProductionContainer};
pub use dto::{EffectDto, ListPermissionsCommand, ListPermissionsResultDto, PermissionEntryDto};
pub use error::ListPermissionsError;
pub use ports::{ListPermissionsPort, ListPermissionsRequest};
pub use use_case::ListPermissionsUseCase;
