use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Encoding error: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

/// Structural rule broken by a requested claim set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("uid must be a string")]
    UidNotString,
    #[error("uid too long: {len} characters, limit is {max}")]
    UidTooLong { len: usize, max: usize },
    #[error("uid is required unless admin is set")]
    UidRequired,
    #[error("expiration must be after issued-at (iat={issued_at}, exp={expires_at})")]
    ExpirationNotAfterIssuedAt { issued_at: i64, expires_at: i64 },
    #[error("expiration out of range: default validity from iat={issued_at} overflows")]
    ExpirationOutOfRange { issued_at: i64 },
    #[error("payload too large: encoded claims are {len} characters, limit is {max}")]
    PayloadTooLarge { len: usize, max: usize },
}
