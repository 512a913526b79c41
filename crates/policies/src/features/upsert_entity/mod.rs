//! `UpsertEntity` vertical slice: `POST /apps/{id}/entities`.

mod adapter;
mod di;
mod dto;
mod error;
#[cfg(test)]
mod mocks;
mod ports;
mod use_case;

pub use adapter::StoreUpsertEntityPort;
pub use di::{create_production_container, ProductionContainer};
pub use dto::{ParentRefDto, UpsertEntityCommand, UpsertEntityResultDto};
pub use error::UpsertEntityError;
pub use ports::UpsertEntityPort;
pub use use_case::UpsertEntityUseCase;
