//! Centralized HTTP client configuration and form-encoded JSON requests.
//!
//! OAuth2 endpoints all speak the same dialect: a POST with an
//! `application/x-www-form-urlencoded` body, optionally HTTP Basic
//! authenticated, answered by a JSON document. [`FormRequest`] captures that
//! shape once so individual flows only describe their parameters.

use crate::error::PlatformError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method};
use std::time::Duration;
use tracing::{debug, warn};

/// Content type sent with every form request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP client configuration.
///
/// No timeouts are set by default: a request blocks until the server
/// answers or the connection fails.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Total request timeout (default: none)
    pub timeout: Option<Duration>,
    /// Connection timeout (default: none)
    pub connect_timeout: Option<Duration>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            user_agent: concat!("rust-common/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    /// Set the total request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns an error if the client cannot be built (e.g., TLS initialization fails).
///
/// # Examples
///
/// ```
/// use rust_common::{HttpConfig, build_http_client};
/// use std::time::Duration;
///
/// let config = HttpConfig::default().with_timeout(Duration::from_secs(60));
/// let client = build_http_client(&config).expect("Failed to build client");
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = ClientBuilder::new()
        .user_agent(&config.user_agent)
        .use_rustls_tls();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = config.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }

    builder.build()
}

/// Value of an HTTP Basic `Authorization` header for the given credentials.
///
/// ```
/// assert_eq!(
///     rust_common::basic_auth_header("client", "secret"),
///     "Basic Y2xpZW50OnNlY3JldA=="
/// );
/// ```
#[must_use]
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// A form-encoded request whose response body is decoded as JSON.
///
/// Form fields are encoded in insertion order.
#[derive(Debug, Clone)]
pub struct FormRequest {
    url: String,
    method: Method,
    form: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl FormRequest {
    /// Create a POST request to `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::POST,
            form: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// Override the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Append a form field.
    #[must_use]
    pub fn form_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((name.into(), value.into()));
        self
    }

    /// Add a request header.
    #[must_use]
    pub fn set_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Authenticate with HTTP Basic credentials.
    #[must_use]
    pub fn basic_auth(self, username: &str, password: &str) -> Self {
        let value = basic_auth_header(username, password);
        self.set_header(AUTHORIZATION.as_str(), value)
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The `application/x-www-form-urlencoded` body this request sends.
    #[must_use]
    pub fn encoded_body(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.form {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }

    /// Send the request and decode the response body as JSON.
    ///
    /// The body is decoded whatever the status code; authorization servers
    /// report OAuth2 errors as JSON documents too.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::InvalidInput`] for an empty URL,
    /// [`PlatformError::Http`] if the request could not be sent or the body
    /// could not be read, and [`PlatformError::Serialization`] if the body is
    /// not JSON.
    pub async fn send_json(self, client: &Client) -> Result<serde_json::Value, PlatformError> {
        if self.url.trim().is_empty() {
            return Err(PlatformError::invalid_input("request URL is empty"));
        }

        let body = self.encoded_body();
        let mut request = client
            .request(self.method.clone(), &self.url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body);

        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        debug!(method = %self.method, url = %self.url, "Sending form request");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, url = %self.url, "Endpoint answered with non-success status");
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
