use serde::Serialize;

use super::TokenClaims;

#[derive(Serialize)]
pub struct Output {
    pub status: String,
    pub token: Option<String>,
    pub detail: String,
    pub claims: Option<TokenClaims>,
}
