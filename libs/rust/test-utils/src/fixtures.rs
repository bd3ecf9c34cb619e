//! Test fixtures with sample data.
//!
//! The RSA fixtures are one 2048-bit key pair in three encodings, so tests
//! can check that every decoding path yields the same modulus.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

/// RSA private key, PKCS1 (`BEGIN RSA PRIVATE KEY`).
pub const RSA_PKCS1_PEM: &str = include_str!("../fixtures/rsa_pkcs1.pem");

/// The same RSA private key, PKCS8 (`BEGIN PRIVATE KEY`).
pub const RSA_PKCS8_PEM: &str = include_str!("../fixtures/rsa_pkcs8.pem");

/// Public half of the RSA fixture key, SPKI (`BEGIN PUBLIC KEY`).
pub const RSA_PUBLIC_PEM: &str = include_str!("../fixtures/rsa_public.pem");

/// P-256 EC private key, PKCS8. Parses as PKCS8 but cannot sign RS256.
pub const EC_P256_PKCS8_PEM: &str = include_str!("../fixtures/ec_p256_pkcs8.pem");

/// Service identifier used across tests.
pub const SERVICE_ID: &str = "svc-123";

/// Issuer URL used as the JWT audience across tests.
pub const ISSUER_URL: &str = "https://issuer.example/token";

/// Collapse a multi-line PEM into the single-line shape some secret stores
/// produce: every line break removed, markers glued to the body.
#[must_use]
pub fn single_line(pem: &str) -> String {
    pem.lines().map(str::trim).collect()
}

/// The PKCS1 fixture key as a single physical line.
#[must_use]
pub fn rsa_pkcs1_single_line() -> String {
    single_line(RSA_PKCS1_PEM)
}

/// A fixed instant for clock-dependent tests (2021-06-01T12:00:00Z).
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A token endpoint success response.
#[must_use]
pub fn token_response() -> Value {
    json!({
        "access_token": "tok123",
        "token_type": "Bearer",
    })
}

/// An introspection response for an active token.
#[must_use]
pub fn introspection_response() -> Value {
    json!({
        "active": true,
        "client_id": "svc-123",
        "exp": 1_622_556_000,
        "scope": "openid",
    })
}
