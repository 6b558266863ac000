use serde_json::{Map, Value};

/// Decoded token payload, kept exactly as it was signed.
pub type Claims = Map<String, Value>;

/// Per-request context handed to every resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub user: Option<Claims>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(claims: Claims) -> Self {
        Self { user: Some(claims) }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
