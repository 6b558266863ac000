use std::sync::Arc;

use async_graphql::{EmptyMutation, EmptySubscription, Schema};
use tokio::sync::OnceCell;

pub use crate::modules::viewer::inbound::graphql::QueryRoot;

pub type AppSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema(introspection: bool) -> AppSchema {
    let builder = Schema::build(QueryRoot, EmptyMutation, EmptySubscription);
    let builder = if introspection {
        builder
    } else {
        builder.disable_introspection()
    };
    builder.finish()
}

/// Lazily started GraphQL engine.
///
/// `start` builds the schema on first use and hands back the same instance on
/// every later call, so it is safe to call from each request.
#[derive(Clone)]
pub struct Engine {
    introspection: bool,
    schema: Arc<OnceCell<AppSchema>>,
}

impl Engine {
    pub fn new(introspection: bool) -> Self {
        Self {
            introspection,
            schema: Arc::new(OnceCell::new()),
        }
    }

    pub fn introspection(&self) -> bool {
        self.introspection
    }

    #[cfg(test)]
    pub(crate) fn is_started(&self) -> bool {
        self.schema.initialized()
    }

    pub async fn start(&self) -> &AppSchema {
        let introspection = self.introspection;
        self.schema
            .get_or_init(|| async move {
                tracing::debug!(introspection, "starting GraphQL engine");
                build_schema(introspection)
            })
            .await
    }

    pub async fn dispatch(&self, request: async_graphql::Request) -> async_graphql::Response {
        self.start().await.execute(request).await
    }
}
