// Composition root.
//
// Responsibilities
// - Read config from the environment.
// - Build the auth context resolver and the GraphQL engine.
// - Compose the request pipeline and hand it to a lifecycle (persistent or serverless).

pub mod config;
pub mod error;
pub mod graphql;
pub mod http;
pub mod lifecycle;
pub mod state;
