use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, get_current_timestamp};
use serde_json::Value;

use crate::modules::auth::core::bearer::extract_token;
use crate::modules::auth::core::claims::{Claims, RequestContext};
use crate::modules::auth::core::verdict::{InvalidToken, TokenVerdict};

/// Maps an `Authorization` header onto a [`RequestContext`].
///
/// Resolution never fails: a missing, malformed, expired or foreign token
/// simply produces an anonymous context. Rejecting anonymous callers is left
/// to the resolvers that need a user.
#[derive(Clone)]
pub struct AuthContextResolver {
    decoding_key: Option<DecodingKey>,
    validation: Validation,
}

impl std::fmt::Debug for AuthContextResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AuthContextResolver")
            .field("has_secret", &self.decoding_key.is_some())
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthContextResolver {
    pub fn new(secret: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // `exp` and `nbf` are enforced when present but never required.
        validation.set_required_spec_claims::<&str>(&[]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            decoding_key: secret.map(|s| DecodingKey::from_secret(s.as_bytes())),
            validation,
        }
    }

    pub fn has_secret(&self) -> bool {
        self.decoding_key.is_some()
    }

    pub fn verify(&self, token: &str) -> TokenVerdict {
        let Some(key) = self.decoding_key.as_ref() else {
            return TokenVerdict::Invalid(InvalidToken::MissingSecret);
        };

        match jsonwebtoken::decode::<Claims>(token, key, &self.validation) {
            // A token whose `exp` is the current second has already expired.
            Ok(data) if expires_by(&data.claims, get_current_timestamp()) => {
                TokenVerdict::Invalid(InvalidToken::Expired)
            }
            Ok(data) => TokenVerdict::Valid(data.claims),
            Err(err) => TokenVerdict::Invalid(match err.kind() {
                ErrorKind::ExpiredSignature => InvalidToken::Expired,
                ErrorKind::ImmatureSignature => InvalidToken::Immature,
                ErrorKind::InvalidSignature => InvalidToken::BadSignature,
                _ => InvalidToken::Malformed(err.to_string()),
            }),
        }
    }

    pub fn resolve(&self, authorization: Option<&str>) -> RequestContext {
        let token = extract_token(authorization);
        if token.is_empty() {
            return RequestContext::anonymous();
        }

        match self.verify(token) {
            TokenVerdict::Valid(claims) => RequestContext::authenticated(claims),
            TokenVerdict::Invalid(reason) => {
                tracing::debug!(%reason, "ignoring invalid access token");
                RequestContext::anonymous()
            }
        }
    }
}

fn expires_by(claims: &Claims, now: u64) -> bool {
    claims
        .get("exp")
        .and_then(Value::as_u64)
        .is_some_and(|exp| exp <= now)
}
