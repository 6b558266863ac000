use async_graphql::{Context, ErrorExtensions, Json, Object, Result as GqlResult};

use crate::modules::auth::core::claims::{Claims, RequestContext};

/// Returns the caller's claims, or an `UNAUTHENTICATED` error for anonymous requests.
pub fn require_user<'a>(context: &Context<'a>) -> GqlResult<&'a Claims> {
    context
        .data_opt::<RequestContext>()
        .and_then(|request_context| request_context.user.as_ref())
        .ok_or_else(|| {
            async_graphql::Error::new("Unauthenticated")
                .extend_with(|_, extensions| extensions.set("code", "UNAUTHENTICATED"))
        })
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Claims of the current caller, `null` when anonymous.
    async fn viewer(&self, context: &Context<'_>) -> Option<Json<Claims>> {
        context
            .data_opt::<RequestContext>()
            .and_then(|request_context| request_context.user.clone())
            .map(Json)
    }

    async fn authenticated(&self, context: &Context<'_>) -> bool {
        context
            .data_opt::<RequestContext>()
            .is_some_and(RequestContext::is_authenticated)
    }

    /// The `sub` claim of the current caller.
    async fn subject(&self, context: &Context<'_>) -> GqlResult<String> {
        let claims = require_user(context)?;
        claims
            .get("sub")
            .and_then(|sub| sub.as_str())
            .map(str::to_owned)
            .ok_or_else(|| async_graphql::Error::new("token carries no subject"))
    }
}

#[cfg(test)]
mod viewer_graphql_inbound_tests {
    use async_graphql::{EmptyMutation, EmptySubscription, Request, Schema};
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::QueryRoot;
    use crate::modules::auth::core::claims::{Claims, RequestContext};

    type TestSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

    #[fixture]
    fn schema() -> TestSchema {
        Schema::new(QueryRoot, EmptyMutation, EmptySubscription)
    }

    fn claims() -> Claims {
        let mut claims = Claims::new();
        claims.insert("sub".into(), json!("user-1"));
        claims.insert("role".into(), json!("admin"));
        claims
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_resolve_a_null_viewer_for_anonymous_requests(schema: TestSchema) {
        let response = schema
            .execute(Request::new("{ viewer authenticated }").data(RequestContext::anonymous()))
            .await;

        assert!(response.errors.is_empty());
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({ "viewer": null, "authenticated": false })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_resolve_the_claims_of_an_authenticated_viewer(schema: TestSchema) {
        let response = schema
            .execute(
                Request::new("{ viewer authenticated subject }")
                    .data(RequestContext::authenticated(claims())),
            )
            .await;

        assert!(response.errors.is_empty());
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({
                "viewer": { "sub": "user-1", "role": "admin" },
                "authenticated": true,
                "subject": "user-1",
            })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_the_subject_of_an_anonymous_request(schema: TestSchema) {
        let response = schema
            .execute(Request::new("{ subject }").data(RequestContext::anonymous()))
            .await;

        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].message, "Unauthenticated");
        let code = response.errors[0]
            .extensions
            .as_ref()
            .and_then(|extensions| extensions.get("code"))
            .cloned();
        assert_eq!(code, Some(async_graphql::Value::from("UNAUTHENTICATED")));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_treat_a_missing_context_as_anonymous(schema: TestSchema) {
        let response = schema.execute("{ viewer authenticated }").await;

        assert_eq!(
            response.data.into_json().unwrap(),
            json!({ "viewer": null, "authenticated": false })
        );
    }
}
