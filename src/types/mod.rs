// src/types/mod.rs
pub mod claims;
pub mod options;
pub mod output;

pub use claims::{ClaimMap, TokenClaims};
pub use options::{TokenOptions, ValidityWindow};
pub use output::Output;
