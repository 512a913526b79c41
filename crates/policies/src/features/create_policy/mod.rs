//! `CreatePolicy` vertical slice: `POST /apps/{id}/policies`.

mod adapter;
mod di;
mod dto;
mod error;
#[cfg(test)]
mod mocks;
mod ports;
mod use_case;

pub use adapter::StoreCreatePolicyPort;
pub use di::{create_production_container, ProductionContainer};
pub use dto::{CreatePolicyCommand, CreatePolicyResultDto};
pub use error::CreatePolicyError;
pub use ports::CreatePolicyPort;
pub use use_case::CreatePolicyUseCase;
