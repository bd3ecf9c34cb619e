//! OAuth2 command line client library.
//!
//! Turns a service account's RSA private key into a signed JWT-bearer
//! assertion and exchanges it for an access token. Also covers the
//! resource-owner-password grant and token introspection.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assertion;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod jwt;
pub mod key;
pub mod output;

// Re-exports for convenience
pub use assertion::create_and_sign_jwt;
pub use client::OAuthClient;
pub use config::{ConfigStore, Configuration, Provider};
pub use error::OAuthError;
