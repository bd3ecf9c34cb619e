//! Error type of the OAuth flows.

use crate::config::ConfigError;
use crate::jwt::SignError;
use crate::key::KeyError;
use rust_common::PlatformError;
use thiserror::Error;

/// Errors of the OAuth flows.
///
/// Transport and decode failures of the HTTP exchange are kept apart so
/// callers can tell an unreachable server from one that answered garbage.
#[derive(Error, Debug)]
pub enum OAuthError {
    /// The private key could not be read or parsed
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The assertion could not be signed
    #[error(transparent)]
    Sign(#[from] SignError),

    /// The configuration could not be loaded or written
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The endpoint could not be reached
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint did not answer with JSON
    #[error("Response is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request is missing something, such as its URL
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Command output could not be written
    #[error("Unable to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl OAuthError {
    /// Network-level failure: nothing usable came back from the server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The server answered, but not with JSON.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Errors raised before any request is sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Key(_) | Self::Sign(_) | Self::Config(_))
    }
}

impl From<PlatformError> for OAuthError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::Http(e) => Self::Transport(e),
            PlatformError::Serialization(e) => Self::Decode(e),
            PlatformError::InvalidInput(msg) => Self::InvalidRequest(msg),
        }
    }
}
