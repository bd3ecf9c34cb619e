//! JWT-bearer assertion claims and RS256 signing.

pub mod claims;
pub mod signer;

pub use claims::{ASSERTION_TTL_HOURS, Claims};
pub use signer::{SignError, sign_claims, verify_assertion};
