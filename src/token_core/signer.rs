// src/token_core/signer.rs
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::error::TokenError;
use crate::types::TokenClaims;

/// Turns an assembled claim set into a compact serialized token.
pub trait Signer {
    fn sign(&self, claims: &TokenClaims, secret: &[u8]) -> Result<String, TokenError>;
}

/// HMAC-SHA256 compact JWS through `jsonwebtoken`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hs256Signer;

impl Signer for Hs256Signer {
    fn sign(&self, claims: &TokenClaims, secret: &[u8]) -> Result<String, TokenError> {
        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, claims, &EncodingKey::from_secret(secret))?;
        Ok(token)
    }
}
