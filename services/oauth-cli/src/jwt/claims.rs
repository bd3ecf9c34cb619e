//! Claim set of JWT-bearer assertions.

use crate::config::Provider;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime of a JWT-bearer assertion.
pub const ASSERTION_TTL_HOURS: i64 = 2;

/// Claim set of a JWT-bearer assertion.
///
/// The service account is both issuer and subject; the audience is the
/// authorization server's issuer URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Audience: the provider's issuer URL
    pub aud: String,
    /// Expiry, Unix seconds
    pub exp: i64,
    /// Issuer: the service identifier
    pub iss: String,
    /// Subject: the service identifier
    pub sub: String,
}

impl Claims {
    /// Build the claim set for `service_id` at instant `now`.
    ///
    /// `exp` is `now` plus [`ASSERTION_TTL_HOURS`], in Unix seconds.
    #[must_use]
    pub fn for_service(service_id: &str, provider: &Provider, now: DateTime<Utc>) -> Self {
        Self {
            aud: provider.issuer_url.clone(),
            exp: (now + Duration::hours(ASSERTION_TTL_HOURS)).timestamp(),
            iss: service_id.to_string(),
            sub: service_id.to_string(),
        }
    }

    /// Whether the assertion is no longer valid at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}
