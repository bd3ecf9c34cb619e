//! Centralized error types for the workspace's HTTP plumbing.
//!
//! Every failure of a [`FormRequest`](crate::http::FormRequest) lands in one
//! of these variants, so callers can tell a network problem apart from a
//! server that answered with something other than JSON.

use thiserror::Error;

/// Common error type for platform operations.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// HTTP request failed before a complete response body was read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PlatformError {
    /// Check if this error happened at the transport level.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_common::PlatformError;
    ///
    /// let err: PlatformError = serde_json::from_str::<serde_json::Value>("<html>")
    ///     .unwrap_err()
    ///     .into();
    /// assert!(!err.is_transport());
    /// ```
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Check if the transport failure was a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }

    /// Create an invalid input error with the given message.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_is_not_transport() {
        let err: PlatformError = serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err()
            .into();
        assert!(!err.is_transport());
        assert!(!err.is_timeout());
        assert!(err.to_string().starts_with("Serialization error: "));
    }

    #[test]
    fn test_error_display() {
        let err = PlatformError::invalid_input("empty url");
        assert_eq!(err.to_string(), "Invalid input: empty url");
        assert!(!err.is_transport());
    }
}
