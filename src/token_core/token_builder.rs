use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::constants::{DEFAULT_MAX_ENCODED_CLAIMS_LEN, MAX_UID_LEN, TOKEN_VERSION, UID_CLAIM};
use crate::error::{TokenError, ValidationError};
use crate::token_core::signer::{Hs256Signer, Signer};
use crate::types::{ClaimMap, TokenClaims, TokenOptions};

/// A signed token together with the claim set it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Validates requested claims and issues signed custom tokens.
///
/// The builder never changes after construction, so a single instance can be
/// shared between threads as long as its signer and clock can.
pub struct TokenBuilder<S = Hs256Signer, C = SystemClock> {
    secret: String,
    max_encoded_claims_len: usize,
    signer: S,
    clock: C,
}

impl TokenBuilder {
    /// An empty secret is accepted here but every build will fail with
    /// [`TokenError::Configuration`].
    pub fn new(secret: impl Into<String>) -> Self {
        TokenBuilder {
            secret: secret.into(),
            max_encoded_claims_len: DEFAULT_MAX_ENCODED_CLAIMS_LEN,
            signer: Hs256Signer,
            clock: SystemClock,
        }
    }
}

impl<S, C> TokenBuilder<S, C> {
    /// Overrides the ceiling on the base64url claim segment.
    pub fn with_max_encoded_claims_len(mut self, max: usize) -> Self {
        self.max_encoded_claims_len = max;
        self
    }

    pub fn with_signer<T: Signer>(self, signer: T) -> TokenBuilder<T, C> {
        TokenBuilder {
            secret: self.secret,
            max_encoded_claims_len: self.max_encoded_claims_len,
            signer,
            clock: self.clock,
        }
    }

    pub fn with_clock<T: Clock>(self, clock: T) -> TokenBuilder<S, T> {
        TokenBuilder {
            secret: self.secret,
            max_encoded_claims_len: self.max_encoded_claims_len,
            signer: self.signer,
            clock,
        }
    }

    pub fn max_encoded_claims_len(&self) -> usize {
        self.max_encoded_claims_len
    }
}

impl<S: Signer, C: Clock> TokenBuilder<S, C> {
    /// Validates `claims`, merges them with the reserved claims derived from
    /// `options` and returns the signed token.
    pub fn build(
        &self,
        claims: Option<&ClaimMap>,
        options: Option<&TokenOptions>,
    ) -> Result<String, TokenError> {
        Ok(self.issue(claims, options)?.token)
    }

    /// Like [`build`](Self::build), but also hands back the signed claim set.
    pub fn issue(
        &self,
        claims: Option<&ClaimMap>,
        options: Option<&TokenOptions>,
    ) -> Result<IssuedToken, TokenError> {
        let claims = self.assemble(claims, options)?;
        let token = self.signer.sign(&claims, self.secret.as_bytes())?;

        debug!(
            has_subject = claims.sub.is_some(),
            admin = claims.admin,
            debug = claims.debug,
            exp = claims.exp,
            token_len = token.len(),
            "issued custom token"
        );

        Ok(IssuedToken { token, claims })
    }

    /// Runs every check and produces the claim set that would be signed.
    pub fn assemble(
        &self,
        claims: Option<&ClaimMap>,
        options: Option<&TokenOptions>,
    ) -> Result<TokenClaims, TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::Configuration(
                "secret key must not be empty".to_string(),
            ));
        }

        let options = options.cloned().unwrap_or_default();
        let mut data = claims.cloned().unwrap_or_default();
        let sub = take_uid(&mut data, options.admin)?;

        let window = options.resolve(self.clock.now())?;
        if window.expires_at <= window.issued_at {
            return Err(ValidationError::ExpirationNotAfterIssuedAt {
                issued_at: window.issued_at,
                expires_at: window.expires_at,
            }
            .into());
        }

        let claims = TokenClaims {
            v: TOKEN_VERSION,
            d: data,
            iat: window.issued_at,
            nbf: window.issued_at,
            exp: window.expires_at,
            admin: options.admin,
            debug: options.debug,
            sub,
        };

        let len = encoded_claims_len(&claims)?;
        if len > self.max_encoded_claims_len {
            return Err(ValidationError::PayloadTooLarge {
                len,
                max: self.max_encoded_claims_len,
            }
            .into());
        }

        Ok(claims)
    }
}

impl<S, C> fmt::Debug for TokenBuilder<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBuilder")
            .field("secret", &"<redacted>")
            .field("max_encoded_claims_len", &self.max_encoded_claims_len)
            .finish()
    }
}

/// Pulls `uid` out of the custom data and checks it.
fn take_uid(data: &mut ClaimMap, admin: bool) -> Result<Option<String>, ValidationError> {
    match data.remove(UID_CLAIM) {
        Some(Value::String(uid)) => {
            let len = uid.chars().count();
            if len > MAX_UID_LEN {
                return Err(ValidationError::UidTooLong {
                    len,
                    max: MAX_UID_LEN,
                });
            }
            Ok(Some(uid))
        }
        Some(_) => Err(ValidationError::UidNotString),
        None if admin => Ok(None),
        None => Err(ValidationError::UidRequired),
    }
}

/// Length of the unpadded base64url segment the signer will emit for `claims`.
fn encoded_claims_len(claims: &TokenClaims) -> Result<usize, TokenError> {
    let json = serde_json::to_vec(claims).map_err(jsonwebtoken::errors::Error::from)?;
    Ok((json.len() * 4 + 2) / 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SECRET: &str = "moozooherpderp";
    const NOW: i64 = 1_700_000_000;

    struct CountingSigner<'a>(&'a AtomicUsize);

    impl Signer for CountingSigner<'_> {
        fn sign(&self, _claims: &TokenClaims, _secret: &[u8]) -> Result<String, TokenError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok("header.payload.signature".to_string())
        }
    }

    fn claims(value: Value) -> ClaimMap {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn builder() -> TokenBuilder<Hs256Signer, FixedClock> {
        TokenBuilder::new(SECRET).with_clock(FixedClock(Utc.timestamp_opt(NOW, 0).unwrap()))
    }

    fn validation_error(result: Result<TokenClaims, TokenError>) -> ValidationError {
        match result {
            Err(TokenError::Validation(err)) => err,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn uid_is_lifted_out_of_custom_data() {
        let input = claims(json!({ "uid": "1", "abc": "def", "n": 3 }));
        let assembled = builder().assemble(Some(&input), None).unwrap();

        assert_eq!(assembled.sub.as_deref(), Some("1"));
        assert!(!assembled.d.contains_key("uid"));
        assert_eq!(assembled.d.get("abc"), Some(&json!("def")));
        assert_eq!(assembled.d.get("n"), Some(&json!(3)));
        // caller's map untouched
        assert!(input.contains_key("uid"));
    }

    #[test]
    fn reserved_claims_come_from_resolved_options() {
        let input = claims(json!({ "uid": "alice" }));
        let assembled = builder().assemble(Some(&input), None).unwrap();

        assert_eq!(assembled.v, 0);
        assert_eq!(assembled.iat, NOW);
        assert_eq!(assembled.nbf, NOW);
        assert_eq!(assembled.exp, NOW + 86_400);
        assert!(!assembled.admin);
        assert!(!assembled.debug);
    }

    #[test]
    fn non_string_uid_is_rejected_even_for_admin() {
        let admin = TokenOptions::default().with_admin(true);
        for uid in [json!(1), Value::Null, json!(true), json!({ "id": "x" }), json!(["x"])] {
            let input = claims(json!({ "uid": uid }));
            let err = validation_error(builder().assemble(Some(&input), Some(&admin)));
            assert_eq!(err, ValidationError::UidNotString);
        }
    }

    #[test]
    fn uid_length_counts_characters() {
        let input = claims(json!({ "uid": "é".repeat(256) }));
        assert!(builder().assemble(Some(&input), None).is_ok());

        let input = claims(json!({ "uid": "é".repeat(257) }));
        let err = validation_error(builder().assemble(Some(&input), None));
        assert_eq!(err, ValidationError::UidTooLong { len: 257, max: 256 });
    }

    #[test]
    fn missing_uid_requires_admin() {
        let err = validation_error(builder().assemble(None, None));
        assert_eq!(err, ValidationError::UidRequired);

        let admin = TokenOptions::default().with_admin(true);
        let assembled = builder().assemble(None, Some(&admin)).unwrap();
        assert_eq!(assembled.sub, None);
        assert!(assembled.d.is_empty());
    }

    #[test]
    fn expiry_must_be_strictly_after_issue() {
        let input = claims(json!({ "uid": "1" }));
        let instant = Utc.timestamp_opt(NOW, 0).unwrap();

        let same = TokenOptions::new(Some(instant), Some(instant), false, false);
        let err = validation_error(builder().assemble(Some(&input), Some(&same)));
        assert_eq!(
            err,
            ValidationError::ExpirationNotAfterIssuedAt {
                issued_at: NOW,
                expires_at: NOW
            }
        );

        let reversed = TokenOptions::default().with_expires_at(Utc.timestamp_opt(NOW - 1, 0).unwrap());
        let err = validation_error(builder().assemble(Some(&input), Some(&reversed)));
        assert!(matches!(err, ValidationError::ExpirationNotAfterIssuedAt { .. }));
    }

    #[test]
    fn issue_time_near_the_end_of_time_fails_cleanly() {
        let input = claims(json!({ "uid": "1" }));
        let late = DateTime::<Utc>::MAX_UTC - Duration::hours(1);
        let options = TokenOptions::default().with_issued_at(late);

        let err = validation_error(builder().assemble(Some(&input), Some(&options)));
        assert_eq!(
            err,
            ValidationError::ExpirationOutOfRange {
                issued_at: late.timestamp()
            }
        );
    }

    #[test]
    fn size_ceiling_is_configurable() {
        let input = claims(json!({ "uid": "1", "blob": "x".repeat(200) }));
        assert!(builder().assemble(Some(&input), None).is_ok());

        let err = validation_error(
            builder()
                .with_max_encoded_claims_len(100)
                .assemble(Some(&input), None),
        );
        match err {
            ValidationError::PayloadTooLarge { len, max } => {
                assert_eq!(max, 100);
                assert!(len > 100);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        let input = claims(json!({ "uid": "1" }));
        let result = TokenBuilder::new("").build(Some(&input), None);
        assert!(matches!(result, Err(TokenError::Configuration(_))));
    }

    #[test]
    fn signer_is_not_reached_on_invalid_input() {
        let calls = AtomicUsize::new(0);
        let builder = builder().with_signer(CountingSigner(&calls));

        let bad = [
            claims(json!({ "uid": 1 })),
            claims(json!({ "abc": "no uid" })),
            claims(json!({ "uid": "1".repeat(257) })),
            claims(json!({ "uid": "1", "big": "x".repeat(2_000) })),
        ];
        for input in &bad {
            assert!(builder.build(Some(input), None).is_err());
        }

        let valid = claims(json!({ "uid": "1" }));
        let instant = Utc.timestamp_opt(NOW, 0).unwrap();
        let same = TokenOptions::new(Some(instant), Some(instant), false, false);
        assert!(matches!(
            builder.build(Some(&valid), Some(&same)),
            Err(TokenError::Validation(
                ValidationError::ExpirationNotAfterIssuedAt { .. }
            ))
        ));

        let unkeyed = TokenBuilder::new("").with_signer(CountingSigner(&calls));
        assert!(matches!(
            unkeyed.build(Some(&valid), None),
            Err(TokenError::Configuration(_))
        ));

        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let token = builder
            .build(Some(&claims(json!({ "uid": "1" }))), None)
            .unwrap();
        assert_eq!(token, "header.payload.signature");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let rendered = format!("{:?}", TokenBuilder::new(SECRET));
        assert!(!rendered.contains(SECRET));
    }
}
