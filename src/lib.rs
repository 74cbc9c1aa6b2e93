//! Issues signed custom authentication tokens in the Firebase legacy
//! custom-token format.
//!
//! ```no_run
//! use firebase_token::{ClaimMap, TokenBuilder, TokenOptions};
//! use serde_json::json;
//!
//! let mut claims = ClaimMap::new();
//! claims.insert("uid".into(), json!("user-42"));
//! claims.insert("plan".into(), json!("pro"));
//!
//! let builder = TokenBuilder::new("my-firebase-secret");
//! let token = builder.build(Some(&claims), Some(&TokenOptions::default())).unwrap();
//! assert_eq!(token.split('.').count(), 3);
//! ```

pub mod clock;
pub mod constants;
pub mod error;
pub mod token_core;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{TokenError, ValidationError};
pub use token_core::{Hs256Signer, IssuedToken, Signer, TokenBuilder};
pub use types::{ClaimMap, Output, TokenClaims, TokenOptions, ValidityWindow};
