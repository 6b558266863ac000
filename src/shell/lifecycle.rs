// Lifecycle strategies around the shared pipeline in `shell::http`.
//
// - Persistent: one engine per process, `/graphql` plus `/health`, drains
//   in-flight requests on shutdown.
// - Serverless: one engine per invocation, POST only, failures mapped to a
//   generic 500.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    extract::Request,
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_http::trace::TraceLayer;

use crate::modules::auth::use_cases::resolve_context::handler::AuthContextResolver;
use crate::shell::config::{Config, CorsOrigin, LifecycleKind};
use crate::shell::error::ShellError;
use crate::shell::graphql::Engine;
use crate::shell::http::{GRAPHQL_PATH, persistent_router, serverless_router};
use crate::shell::state::AppState;

#[async_trait]
pub trait Lifecycle: Send + Sync {
    fn kind(&self) -> LifecycleKind;

    /// Whether in-flight requests are drained before the process exits.
    fn drains_on_shutdown(&self) -> bool;

    async fn router(&self) -> Router;
}

pub struct PersistentListener {
    engine: Engine,
    resolver: Arc<AuthContextResolver>,
    cors_origin: CorsOrigin,
}

impl PersistentListener {
    pub fn new(config: &Config, resolver: Arc<AuthContextResolver>) -> Self {
        Self {
            engine: Engine::new(config.introspection),
            resolver,
            cors_origin: config.cors_origin.clone(),
        }
    }
}

#[async_trait]
impl Lifecycle for PersistentListener {
    fn kind(&self) -> LifecycleKind {
        LifecycleKind::Persistent
    }

    fn drains_on_shutdown(&self) -> bool {
        true
    }

    async fn router(&self) -> Router {
        self.engine.start().await;
        tracing::info!(
            introspection = self.engine.introspection(),
            "GraphQL engine started"
        );
        let state = AppState::new(self.engine.clone(), self.resolver.clone());
        persistent_router(state, &self.cors_origin)
    }
}

#[derive(Clone)]
pub struct ServerlessAdapter {
    introspection: bool,
    resolver: Arc<AuthContextResolver>,
    cors_origin: CorsOrigin,
}

impl ServerlessAdapter {
    pub fn new(config: &Config, resolver: Arc<AuthContextResolver>) -> Self {
        Self {
            introspection: config.introspection,
            resolver,
            cors_origin: config.cors_origin.clone(),
        }
    }

    /// Handles a single function invocation.
    pub async fn invoke(&self, request: Request) -> Response {
        if request.method() != Method::POST {
            return method_not_allowed(request.method());
        }

        let engine = Engine::new(self.introspection);
        engine.start().await;

        let state = AppState::new(engine, self.resolver.clone());
        let response = match serverless_router(state, &self.cors_origin)
            .oneshot(request)
            .await
        {
            Ok(response) => response,
            Err(infallible) => match infallible {},
        };

        // The body limit answers on its own; here it is one more chain failure.
        if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ShellError::Pipeline("request body exceeds the size limit".into())
                .into_response();
        }
        response
    }
}

fn method_not_allowed(method: &Method) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        format!("Method {method} Not Allowed"),
    )
        .into_response()
}

#[async_trait]
impl Lifecycle for ServerlessAdapter {
    fn kind(&self) -> LifecycleKind {
        LifecycleKind::Serverless
    }

    fn drains_on_shutdown(&self) -> bool {
        false
    }

    async fn router(&self) -> Router {
        let adapter = self.clone();
        Router::new()
            .fallback(move |request: Request| {
                let adapter = adapter.clone();
                async move { adapter.invoke(request).await }
            })
            .layer(TraceLayer::new_for_http())
    }
}

pub fn from_config(config: &Config, resolver: Arc<AuthContextResolver>) -> Box<dyn Lifecycle> {
    match config.lifecycle {
        LifecycleKind::Persistent => Box::new(PersistentListener::new(config, resolver)),
        LifecycleKind::Serverless => Box::new(ServerlessAdapter::new(config, resolver)),
    }
}

/// Serves `lifecycle` on `listener`. Once `shutdown` resolves, a draining
/// lifecycle stops accepting connections and waits for in-flight requests;
/// other lifecycles ignore it.
pub async fn serve<F>(
    lifecycle: &dyn Lifecycle,
    listener: TcpListener,
    shutdown: F,
) -> Result<(), ShellError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = lifecycle.router().await;
    let server = axum::serve(listener, app);

    if lifecycle.drains_on_shutdown() {
        server
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ShellError::Serve)
    } else {
        drop(shutdown);
        server.await.map_err(ShellError::Serve)
    }
}

pub async fn run(config: &Config) -> Result<(), ShellError> {
    let resolver = Arc::new(AuthContextResolver::new(config.jwt_secret.as_deref()));
    if !resolver.has_secret() {
        tracing::warn!("JWT_SECRET is not set, every request will be anonymous");
    }

    let lifecycle = from_config(config, resolver);
    let addr = config.addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ShellError::Bind { addr, source })?;

    tracing::info!(
        lifecycle = lifecycle.kind().as_str(),
        "Server ready at http://localhost:{}{}",
        config.port,
        GRAPHQL_PATH
    );

    serve(lifecycle.as_ref(), listener, shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, draining in-flight requests");
}
