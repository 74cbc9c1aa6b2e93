// src/types/claims.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied claims. Values keep their JSON variant so validation can
/// match on it directly.
pub type ClaimMap = Map<String, Value>;

/// The claim set handed to the signer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub v: u8,
    pub d: ClaimMap,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub admin: bool,
    pub debug: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}
