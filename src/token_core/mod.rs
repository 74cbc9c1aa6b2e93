pub mod signer;
pub mod token_builder;

pub use signer::{Hs256Signer, Signer};
pub use token_builder::{IssuedToken, TokenBuilder};
