use std::sync::Arc;

use crate::engine::DecisionEngine;

use super::adapter::EngineAuthorizationPort;
use super::ports::AuthorizationPort;
use super::use_case::AuthorizeUseCase;

pub struct AuthorizeContainer<P: AuthorizationPort> {
    port: P,
}

impl<P: AuthorizationPort> AuthorizeContainer<P> {
    pub fn new_with_deps(port: P) -> Self {
        Self { port }
    }

    pub fn create_use_case(self) -> AuthorizeUseCase<P> {
        AuthorizeUseCase::new(self.port)
    }
}

impl AuthorizeContainer<EngineAuthorizationPort> {
    pub fn new_production(engine: Arc<DecisionEngine>) -> Self {
        Self::new_with_deps(EngineAuthorizationPort::new(engine))
    }
}

pub type ProductionContainer = Arc<AuthorizeUseCase<EngineAuthorizationPort>>;

pub fn create_production_container(engine: Arc<DecisionEngine>) -> ProductionContainer {
    Arc::new(AuthorizeUseCase::new(EngineAuthorizationPort::new(engine)))
}
