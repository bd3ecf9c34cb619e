//! Private key handling: single-line PEM repair and PKCS1/PKCS8 parsing.

pub mod normalize;
pub mod parser;

pub use normalize::{BEGIN_RSA_KEY, END_RSA_KEY, normalize_pem};
pub use parser::{KeyError, KeyFormat, PrivateKey, parse_private_key};

use std::path::Path;
use zeroize::Zeroizing;

/// Read private key material from disk into a buffer wiped on drop.
///
/// # Errors
///
/// Returns [`KeyError::Read`] if the file cannot be read.
pub fn read_key_file(path: &Path) -> Result<Zeroizing<Vec<u8>>, KeyError> {
    std::fs::read(path)
        .map(Zeroizing::new)
        .map_err(|source| KeyError::Read {
            path: path.to_path_buf(),
            source,
        })
}
