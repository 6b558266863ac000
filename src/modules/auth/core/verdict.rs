use thiserror::Error;

use crate::modules::auth::core::claims::Claims;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidToken {
    #[error("no signing secret configured")]
    MissingSecret,

    #[error("token expired")]
    Expired,

    #[error("token not yet valid")]
    Immature,

    #[error("signature rejected")]
    BadSignature,

    #[error("malformed token: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenVerdict {
    Valid(Claims),
    Invalid(InvalidToken),
}

