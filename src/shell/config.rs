// Process configuration, read once at startup.
//
// `from_env` loads `.env` and reads the process environment. `from_lookup` holds
// the actual rules so they can be exercised with an injected map.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};

use axum::http::HeaderValue;

use crate::shell::error::ConfigError;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_PERSISTENT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_SERVERLESS_CORS_ORIGIN: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleKind {
    Persistent,
    Serverless,
}

impl LifecycleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleKind::Persistent => "persistent",
            LifecycleKind::Serverless => "serverless",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigin {
    Any,
    Exact(HeaderValue),
}

impl CorsOrigin {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim() == "*" {
            return Ok(CorsOrigin::Any);
        }
        HeaderValue::from_str(raw.trim())
            .map(CorsOrigin::Exact)
            .map_err(|_| ConfigError::Invalid("CORS_ORIGIN"))
    }
}

#[derive(Clone)]
pub struct Config {
    pub lifecycle: LifecycleKind,
    pub port: u16,
    pub cors_origin: CorsOrigin,
    pub introspection: bool,
    pub jwt_secret: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("lifecycle", &self.lifecycle)
            .field("port", &self.port)
            .field("cors_origin", &self.cors_origin)
            .field("introspection", &self.introspection)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lifecycle = match lookup("VERCEL").as_deref() {
            Some("1") => LifecycleKind::Serverless,
            _ => LifecycleKind::Persistent,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            None => DEFAULT_PORT,
        };

        let cors_origin = match lookup("CORS_ORIGIN").filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => CorsOrigin::parse(&raw)?,
            None => match lifecycle {
                LifecycleKind::Persistent => CorsOrigin::parse(DEFAULT_PERSISTENT_CORS_ORIGIN)?,
                LifecycleKind::Serverless => CorsOrigin::parse(DEFAULT_SERVERLESS_CORS_ORIGIN)?,
            },
        };

        // The playground of the long-running server always needs introspection.
        let introspection = match lifecycle {
            LifecycleKind::Persistent => true,
            LifecycleKind::Serverless => lookup("NODE_ENV").as_deref() != Some("production"),
        };

        let jwt_secret = lookup("JWT_SECRET").filter(|secret| !secret.is_empty());

        Ok(Self {
            lifecycle,
            port,
            cors_origin,
            introspection,
            jwt_secret,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[rstest]
    fn it_should_default_to_a_persistent_server_on_port_4000() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.lifecycle, LifecycleKind::Persistent);
        assert_eq!(config.port, 4000);
        assert_eq!(config.addr().to_string(), "0.0.0.0:4000");
        assert_eq!(
            config.cors_origin,
            CorsOrigin::Exact(HeaderValue::from_static("http://localhost:5173"))
        );
        assert!(config.introspection);
        assert_eq!(config.jwt_secret, None);
    }

    #[rstest]
    fn it_should_select_the_serverless_lifecycle_with_a_wildcard_origin() {
        let config = config_from(&[("VERCEL", "1")]).unwrap();

        assert_eq!(config.lifecycle, LifecycleKind::Serverless);
        assert_eq!(config.cors_origin, CorsOrigin::Any);
        assert!(config.introspection);
    }

    #[rstest]
    #[case("0")]
    #[case("true")]
    #[case("")]
    fn it_should_stay_persistent_unless_vercel_is_exactly_one(#[case] vercel: &str) {
        let config = config_from(&[("VERCEL", vercel)]).unwrap();
        assert_eq!(config.lifecycle, LifecycleKind::Persistent);
    }

    #[rstest]
    fn it_should_disable_introspection_for_production_functions() {
        let config = config_from(&[("VERCEL", "1"), ("NODE_ENV", "production")]).unwrap();
        assert!(!config.introspection);
    }

    #[rstest]
    fn it_should_keep_introspection_for_a_production_persistent_server() {
        let config = config_from(&[("NODE_ENV", "production")]).unwrap();
        assert!(config.introspection);
    }

    #[rstest]
    fn it_should_read_port_origin_and_secret() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("CORS_ORIGIN", "https://app.example.com"),
            ("JWT_SECRET", "s3cret"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.cors_origin,
            CorsOrigin::Exact(HeaderValue::from_static("https://app.example.com"))
        );
        assert_eq!(config.jwt_secret.as_deref(), Some("s3cret"));
    }

    #[rstest]
    fn it_should_treat_an_empty_secret_as_missing() {
        let config = config_from(&[("JWT_SECRET", "")]).unwrap();
        assert_eq!(config.jwt_secret, None);
    }

    #[rstest]
    #[case("not-a-port")]
    #[case("70000")]
    fn it_should_reject_an_invalid_port(#[case] port: &str) {
        let err = config_from(&[("PORT", port)]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("PORT")));
    }

    #[rstest]
    fn it_should_reject_an_origin_that_is_not_a_header_value() {
        let err = config_from(&[("CORS_ORIGIN", "http://bad\norigin")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("CORS_ORIGIN")));
    }

    #[rstest]
    fn it_should_redact_the_secret_when_printed() {
        let config = config_from(&[("JWT_SECRET", "s3cret")]).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("<redacted>"));
    }
}
