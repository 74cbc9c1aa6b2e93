// src/constants.rs

/// Value of the `v` claim. The platform only understands schema version 0.
pub const TOKEN_VERSION: u8 = 0;

/// Longest accepted `uid`, counted in characters.
pub const MAX_UID_LEN: usize = 256;

/// Validity of a token built without an explicit expiry.
pub const DEFAULT_VALIDITY_HOURS: i64 = 24;

/// Ceiling on the base64url payload segment of an issued token.
/// The platform refuses custom tokens whose claim segment grows past this.
pub const DEFAULT_MAX_ENCODED_CLAIMS_LEN: usize = 1024;

/// Input claim lifted out of `d` and carried as the token subject.
pub const UID_CLAIM: &str = "uid";
