// src/types/options.rs
use chrono::{DateTime, Duration, Utc};

use crate::constants::DEFAULT_VALIDITY_HOURS;
use crate::error::ValidationError;

/// Non-claim parameters for a single token.
///
/// Holds whatever the caller supplied and nothing more. Unset timestamps are
/// filled in by [`TokenOptions::resolve`] when the token is built, so a value
/// created long before it is used still gets a fresh issue time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenOptions {
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub admin: bool,
    pub debug: bool,
}

/// Issue and expiry instants in whole seconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    pub issued_at: i64,
    pub expires_at: i64,
}

impl TokenOptions {
    pub fn new(
        issued_at: Option<DateTime<Utc>>,
        expires_at: Option<DateTime<Utc>>,
        admin: bool,
        debug: bool,
    ) -> Self {
        TokenOptions {
            issued_at,
            expires_at,
            admin,
            debug,
        }
    }

    pub fn with_issued_at(self, issued_at: DateTime<Utc>) -> Self {
        TokenOptions {
            issued_at: Some(issued_at),
            ..self
        }
    }

    pub fn with_expires_at(self, expires_at: DateTime<Utc>) -> Self {
        TokenOptions {
            expires_at: Some(expires_at),
            ..self
        }
    }

    pub fn with_admin(self, admin: bool) -> Self {
        TokenOptions { admin, ..self }
    }

    pub fn with_debug(self, debug: bool) -> Self {
        TokenOptions { debug, ..self }
    }

    /// Fills in missing timestamps. `now` is only consulted when no explicit
    /// issue time was given.
    ///
    /// Fails only when the default expiry would fall past the last
    /// representable instant.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<ValidityWindow, ValidationError> {
        let issued_at = self.issued_at.unwrap_or(now);
        let expires_at = match self.expires_at {
            Some(expires_at) => expires_at,
            None => issued_at
                .checked_add_signed(Duration::hours(DEFAULT_VALIDITY_HOURS))
                .ok_or(ValidationError::ExpirationOutOfRange {
                    issued_at: issued_at.timestamp(),
                })?,
        };

        Ok(ValidityWindow {
            issued_at: issued_at.timestamp(),
            expires_at: expires_at.timestamp(),
        })
    }
}
