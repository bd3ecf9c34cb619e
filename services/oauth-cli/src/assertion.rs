//! JWT-bearer assertion creation: key normalization, parsing, claims and
//! signing in one step.

use crate::config::Provider;
use crate::error::OAuthError;
use crate::jwt::{Claims, sign_claims};
use crate::key::{normalize_pem, parse_private_key};
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use tracing::{debug, instrument};
use zeroize::Zeroize;

/// Create a signed RS256 assertion for `service_id`, valid for two hours from
/// `now`, with the provider's issuer URL as audience.
///
/// `key_pem` may be a flattened single-line PKCS1 key; it is repaired before
/// parsing.
///
/// # Errors
///
/// Returns [`OAuthError::Key`] if the key cannot be decoded or parsed and
/// [`OAuthError::Sign`] if it cannot sign RS256.
#[instrument(skip(key_pem, provider), fields(audience = %provider.issuer_url))]
pub fn create_and_sign_jwt(
    service_id: &str,
    key_pem: &[u8],
    provider: &Provider,
    now: DateTime<Utc>,
) -> Result<String, OAuthError> {
    let mut normalized = normalize_pem(key_pem);
    let parsed = parse_private_key(&normalized);

    if let Cow::Owned(bytes) = &mut normalized {
        debug!("Repaired single-line private key");
        bytes.zeroize();
    }

    let key = parsed?;
    let claims = Claims::for_service(service_id, provider, now);
    Ok(sign_claims(&claims, &key)?)
}
