use crate::modules::auth::use_cases::resolve_context::handler::AuthContextResolver;
use crate::shell::graphql::Engine;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
    pub resolver: Arc<AuthContextResolver>,
}

impl AppState {
    pub fn new(engine: Engine, resolver: Arc<AuthContextResolver>) -> Self {
        Self { engine, resolver }
    }
}
