//! PEM decoding and PKCS1/PKCS8 private key parsing.

use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::der::Decode;
use rsa::pkcs8::der::asn1::AnyRef;
use rsa::pkcs8::{ObjectIdentifier, PrivateKeyInfo};
use rsa::traits::PublicKeyParts;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Private key loading and parsing errors.
#[derive(Error, Debug)]
pub enum KeyError {
    /// The key file could not be read
    #[error("Error reading private key {}: {source}", path.display())]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No PEM block was found
    #[error("Invalid Key: Key must be PEM encoded PKCS1 or PKCS8 private key")]
    NotPem,

    /// The PEM payload is not a PKCS1 RSA private key
    #[error(transparent)]
    Pkcs1(#[from] rsa::pkcs1::Error),

    /// The PEM payload is not a PKCS8 private key
    #[error(transparent)]
    Pkcs8(#[from] rsa::pkcs8::Error),
}

/// Binary encoding a private key was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    /// RSA-specific `RSAPrivateKey` structure
    Pkcs1,
    /// Algorithm-agnostic `PrivateKeyInfo` structure
    Pkcs8,
}

/// A parsed private key.
///
/// PKCS8 can carry keys of any algorithm. Those are kept as
/// [`PrivateKey::Unsupported`] so that the mismatch with RS256 surfaces when
/// signing, not when parsing. Their payload must still be well-formed DER.
pub enum PrivateKey {
    /// An RSA private key
    Rsa {
        /// The key
        key: RsaPrivateKey,
        /// Encoding it was decoded from
        format: KeyFormat,
    },
    /// A PKCS8 key of another algorithm
    Unsupported {
        /// Dotted OID of the key algorithm
        algorithm_oid: String,
    },
}

impl PrivateKey {
    /// Encoding the key was decoded from.
    #[must_use]
    pub const fn format(&self) -> KeyFormat {
        match self {
            Self::Rsa { format, .. } => *format,
            Self::Unsupported { .. } => KeyFormat::Pkcs8,
        }
    }

    /// The RSA key, if this is one.
    #[must_use]
    pub const fn rsa(&self) -> Option<&RsaPrivateKey> {
        match self {
            Self::Rsa { key, .. } => Some(key),
            Self::Unsupported { .. } => None,
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa { key, format } => f
                .debug_struct("PrivateKey::Rsa")
                .field("format", format)
                .field("bits", &key.n().bits())
                .finish_non_exhaustive(),
            Self::Unsupported { algorithm_oid } => f
                .debug_struct("PrivateKey::Unsupported")
                .field("algorithm_oid", algorithm_oid)
                .finish(),
        }
    }
}

/// `rsaEncryption` algorithm identifier.
const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

type ParseAttempt = fn(&[u8]) -> Result<PrivateKey, KeyError>;

/// Decoders tried in order; the first success wins and the last failure is
/// reported.
const PARSE_ATTEMPTS: [(KeyFormat, ParseAttempt); 2] = [
    (KeyFormat::Pkcs1, parse_pkcs1),
    (KeyFormat::Pkcs8, parse_pkcs8),
];

/// Decode a PEM block and parse its payload as a private key.
///
/// # Errors
///
/// Returns [`KeyError::NotPem`] if no PEM block can be decoded, and the
/// PKCS8 error ([`KeyError::Pkcs8`]) if the payload is neither PKCS1 nor
/// PKCS8.
pub fn parse_private_key(pem_bytes: &[u8]) -> Result<PrivateKey, KeyError> {
    let block = pem::parse(pem_bytes).map_err(|e| {
        debug!(error = %e, "PEM decoding failed");
        KeyError::NotPem
    })?;

    let mut last_error = None;
    for (format, attempt) in PARSE_ATTEMPTS {
        match attempt(block.contents()) {
            Ok(key) => {
                debug!(?format, "Parsed private key");
                return Ok(key);
            }
            Err(e) => {
                debug!(?format, error = %e, "Private key parse attempt failed");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or(KeyError::NotPem))
}

fn parse_pkcs1(der: &[u8]) -> Result<PrivateKey, KeyError> {
    let key = RsaPrivateKey::from_pkcs1_der(der)?;
    Ok(PrivateKey::Rsa {
        key,
        format: KeyFormat::Pkcs1,
    })
}

fn parse_pkcs8(der: &[u8]) -> Result<PrivateKey, KeyError> {
    let info = PrivateKeyInfo::try_from(der).map_err(rsa::pkcs8::Error::from)?;

    if info.algorithm.oid != RSA_ENCRYPTION_OID {
        AnyRef::from_der(info.private_key).map_err(rsa::pkcs8::Error::from)?;
        return Ok(PrivateKey::Unsupported {
            algorithm_oid: info.algorithm.oid.to_string(),
        });
    }

    let key = RsaPrivateKey::try_from(info)?;
    Ok(PrivateKey::Rsa {
        key,
        format: KeyFormat::Pkcs8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::RsaPublicKey;
    use rsa::pkcs8::DecodePublicKey;
    use test_utils::fixtures;

    fn fixture_public_key() -> RsaPublicKey {
        RsaPublicKey::from_public_key_pem(fixtures::RSA_PUBLIC_PEM).unwrap()
    }

    #[test]
    fn test_parse_pkcs1() {
        let key = parse_private_key(fixtures::RSA_PKCS1_PEM.as_bytes()).unwrap();

        assert_eq!(key.format(), KeyFormat::Pkcs1);
        assert_eq!(key.rsa().unwrap().n(), fixture_public_key().n());
    }

    #[test]
    fn test_parse_pkcs8_via_fallback() {
        let key = parse_private_key(fixtures::RSA_PKCS8_PEM.as_bytes()).unwrap();

        assert_eq!(key.format(), KeyFormat::Pkcs8);
        assert_eq!(key.rsa().unwrap().n(), fixture_public_key().n());
    }

    #[test]
    fn test_parse_ec_pkcs8_is_unsupported_not_error() {
        let key = parse_private_key(fixtures::EC_P256_PKCS8_PEM.as_bytes()).unwrap();

        assert!(key.rsa().is_none());
        match key {
            PrivateKey::Unsupported { algorithm_oid } => {
                assert_eq!(algorithm_oid, "1.2.840.10045.2.1");
            }
            PrivateKey::Rsa { .. } => panic!("EC key parsed as RSA"),
        }
    }

    #[test]
    fn test_corrupted_ec_pkcs8_is_rejected() {
        use rsa::pkcs8::der::Encode;

        let block = pem::parse(fixtures::EC_P256_PKCS8_PEM).unwrap();
        let info = PrivateKeyInfo::try_from(block.contents()).unwrap();
        let corrupted = PrivateKeyInfo::new(info.algorithm, &[0u8; 32]).to_der().unwrap();
        let pem = pem::encode(&pem::Pem::new("PRIVATE KEY", corrupted));

        let err = parse_private_key(pem.as_bytes()).unwrap_err();
        assert!(matches!(err, KeyError::Pkcs8(_)), "got {err:?}");
    }

    #[test]
    fn test_non_pem_input() {
        let err = parse_private_key(b"definitely not a key").unwrap_err();

        assert!(matches!(err, KeyError::NotPem));
        assert_eq!(
            err.to_string(),
            "Invalid Key: Key must be PEM encoded PKCS1 or PKCS8 private key"
        );
    }

    #[test]
    fn test_garbage_payload_reports_pkcs8_error() {
        let garbage = pem::encode(&pem::Pem::new("RSA PRIVATE KEY", vec![0x30, 0x03, 0x02, 0x01]));
        let err = parse_private_key(garbage.as_bytes()).unwrap_err();

        assert!(matches!(err, KeyError::Pkcs8(_)), "got {err:?}");
    }

    #[test]
    fn test_public_key_pem_is_not_a_private_key() {
        let err = parse_private_key(fixtures::RSA_PUBLIC_PEM.as_bytes()).unwrap_err();
        assert!(matches!(err, KeyError::Pkcs8(_)));
    }

    #[test]
    fn test_debug_does_not_leak_key_material() {
        let key = parse_private_key(fixtures::RSA_PKCS1_PEM.as_bytes()).unwrap();
        let debug = format!("{key:?}");

        assert!(debug.contains("Pkcs1"));
        assert!(debug.contains("2048"));
        assert!(!debug.contains("primes"));
    }
}
