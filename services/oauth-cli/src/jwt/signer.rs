//! RS256 signing of assertion claims.

use crate::jwt::claims::Claims;
use crate::key::PrivateKey;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rsa::RsaPublicKey;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use thiserror::Error;

/// Signing errors. All of them abort the flow before any exchange.
#[derive(Error, Debug)]
pub enum SignError {
    /// The key's algorithm cannot produce RS256 signatures
    #[error("create: sign token: key is of invalid type ({algorithm_oid})")]
    UnsupportedKeyType {
        /// Dotted OID of the key algorithm
        algorithm_oid: String,
    },

    /// The RSA key could not be re-encoded for the signing backend
    #[error("create: sign token: {0}")]
    KeyEncoding(#[source] rsa::pkcs1::Error),

    /// The signing backend rejected the key or failed
    #[error("create: sign token: {0}")]
    Jwt(#[source] jsonwebtoken::errors::Error),

    /// Signature or audience verification failed
    #[error("verify token: {0}")]
    Verify(#[source] jsonwebtoken::errors::Error),
}

/// Sign `claims` with RS256, producing a compact JWT.
///
/// # Errors
///
/// Returns [`SignError::UnsupportedKeyType`] for non-RSA keys and wraps any
/// backend failure.
pub fn sign_claims(claims: &Claims, key: &PrivateKey) -> Result<String, SignError> {
    let rsa_key = match key {
        PrivateKey::Rsa { key, .. } => key,
        PrivateKey::Unsupported { algorithm_oid } => {
            return Err(SignError::UnsupportedKeyType {
                algorithm_oid: algorithm_oid.clone(),
            });
        }
    };

    let der = rsa_key.to_pkcs1_der().map_err(SignError::KeyEncoding)?;
    let encoding_key = EncodingKey::from_rsa_der(der.as_bytes());

    encode(&Header::new(Algorithm::RS256), claims, &encoding_key).map_err(SignError::Jwt)
}

/// Verify an assertion's RS256 signature and audience and return its claims.
///
/// Expiry is not checked here; the token endpoint enforces it.
///
/// # Errors
///
/// Returns [`SignError::Verify`] if the token is malformed, signed by another
/// key, or issued for another audience.
pub fn verify_assertion(
    token: &str,
    public_key: &RsaPublicKey,
    audience: &str,
) -> Result<Claims, SignError> {
    let decoding_key = DecodingKey::from_rsa_raw_components(
        &public_key.n().to_bytes_be(),
        &public_key.e().to_bytes_be(),
    );

    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_exp = false;
    validation.set_audience(&[audience]);
    validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(SignError::Verify)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Provider;
    use crate::key::parse_private_key;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use test_utils::fixtures;

    fn claims() -> Claims {
        let provider = Provider::new("test").with_issuer_url(fixtures::ISSUER_URL);
        Claims::for_service(fixtures::SERVICE_ID, &provider, fixtures::fixed_now())
    }

    fn public_key() -> RsaPublicKey {
        use rsa::pkcs8::DecodePublicKey;
        RsaPublicKey::from_public_key_pem(fixtures::RSA_PUBLIC_PEM).unwrap()
    }

    #[test]
    fn test_sign_produces_compact_rs256_jwt() {
        let key = parse_private_key(fixtures::RSA_PKCS1_PEM.as_bytes()).unwrap();
        let token = sign_claims(&claims(), &key).unwrap();

        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 3);

        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[0]).unwrap()).unwrap();
        assert_eq!(header["alg"], "RS256");
        assert_eq!(header["typ"], "JWT");
    }

    #[test]
    fn test_signatures_verify_with_public_key() {
        let key = parse_private_key(fixtures::RSA_PKCS8_PEM.as_bytes()).unwrap();
        let claims = claims();

        let first = sign_claims(&claims, &key).unwrap();
        let second = sign_claims(&claims, &key).unwrap();

        for token in [first, second] {
            let decoded = verify_assertion(&token, &public_key(), fixtures::ISSUER_URL).unwrap();
            assert_eq!(decoded, claims);
        }
    }

    #[test]
    fn test_wrong_audience_fails_verification() {
        let key = parse_private_key(fixtures::RSA_PKCS1_PEM.as_bytes()).unwrap();
        let token = sign_claims(&claims(), &key).unwrap();

        let err = verify_assertion(&token, &public_key(), "https://other.example").unwrap_err();
        assert!(matches!(err, SignError::Verify(_)));
    }

    #[test]
    fn test_ec_key_fails_at_signing() {
        let key = parse_private_key(fixtures::EC_P256_PKCS8_PEM.as_bytes()).unwrap();
        let err = sign_claims(&claims(), &key).unwrap_err();

        assert!(matches!(err, SignError::UnsupportedKeyType { .. }));
        assert!(err.to_string().starts_with("create: sign token: "));
    }
}
