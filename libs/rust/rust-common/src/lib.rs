//! Shared library for cross-cutting concerns in the oauth-cli workspace.
//!
//! This crate provides centralized implementations for:
//! - Error types separating transport failures from decode failures
//! - HTTP client configuration and form-encoded JSON requests
//! - Tracing subscriber initialization

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod tracing_config;

pub use error::PlatformError;
pub use http::{
    FORM_CONTENT_TYPE, FormRequest, HttpConfig, basic_auth_header, build_http_client,
};
pub use tracing_config::{TracingConfig, init_tracing};
