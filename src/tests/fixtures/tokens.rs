// Shared test fixtures for minting signed tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::json;

use crate::modules::auth::core::claims::Claims;

pub const SECRET: &str = "test-secret-0001";

pub fn default_claims() -> Claims {
    let now = Utc::now();
    let mut claims = Claims::new();
    claims.insert("sub".into(), json!("user-fixed-0001"));
    claims.insert("email".into(), json!("user@example.com"));
    claims.insert("iat".into(), json!(now.timestamp()));
    claims.insert("exp".into(), json!((now + Duration::hours(1)).timestamp()));
    claims
}

pub fn sign_with_algorithm(claims: &Claims, secret: &str, algorithm: Algorithm) -> String {
    jsonwebtoken::encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn sign(claims: &Claims, secret: &str) -> String {
    sign_with_algorithm(claims, secret, Algorithm::HS256)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
