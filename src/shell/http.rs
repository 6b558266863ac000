// The request pipeline shared by both lifecycles:
// CORS -> body parse -> auth context -> engine dispatch.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse, rejection::GraphQLRejection};
use axum::{
    Router,
    extract::{RawQuery, State},
    http::{HeaderMap, Method, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::modules::health::inbound::http as health_http;
use crate::shell::config::CorsOrigin;
use crate::shell::error::ShellError;
use crate::shell::state::AppState;

pub const GRAPHQL_PATH: &str = "/graphql";
pub const HEALTH_PATH: &str = "/health";
/// Largest accepted request body.
pub const BODY_LIMIT_BYTES: usize = 100 * 1024;

/// Credentials are always allowed, so a wildcard origin is served by echoing
/// the caller's origin back.
pub fn cors_layer(origin: &CorsOrigin) -> CorsLayer {
    let allow_origin = match origin {
        CorsOrigin::Any => AllowOrigin::mirror_request(),
        CorsOrigin::Exact(value) => AllowOrigin::exact(value.clone()),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

async fn execute(
    state: &AppState,
    headers: &HeaderMap,
    request: async_graphql::Request,
) -> GraphQLResponse {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let context = state.resolver.resolve(authorization);
    state.engine.dispatch(request.data(context)).await.into()
}

pub async fn graphql(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    execute(&state, &headers, request.into_inner()).await
}

/// Same as [`graphql`], but a body that cannot be parsed is reported as a
/// generic internal error instead of the extractor's own rejection.
pub async fn graphql_or_fail(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Result<GraphQLRequest, GraphQLRejection>,
) -> Result<GraphQLResponse, ShellError> {
    let request = request.map_err(|rejection| ShellError::Pipeline(rejection.0.to_string()))?;
    Ok(execute(&state, &headers, request.into_inner()).await)
}

pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

/// `GET /graphql` runs the operation from the query string, or serves the
/// playground when there is none.
pub async fn graphql_or_playground(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    request: Result<GraphQLRequest, GraphQLRejection>,
) -> Response {
    if query.is_none_or(|query| query.is_empty()) {
        return graphiql().await.into_response();
    }
    match request {
        Ok(request) => execute(&state, &headers, request.into_inner())
            .await
            .into_response(),
        Err(rejection) => rejection.into_response(),
    }
}

pub fn persistent_router(state: AppState, cors_origin: &CorsOrigin) -> Router {
    let graphql_routes = Router::new()
        .route(GRAPHQL_PATH, post(graphql).get(graphql_or_playground))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(cors_layer(cors_origin));

    Router::new()
        .merge(graphql_routes)
        .route(HEALTH_PATH, get(health_http::handle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn serverless_router(state: AppState, cors_origin: &CorsOrigin) -> Router {
    Router::new()
        .fallback(graphql_or_fail)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(cors_layer(cors_origin))
        .with_state(state)
}
