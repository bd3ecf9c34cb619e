//! OAuth2 grant and introspection calls against the configured provider.

use crate::config::Provider;
use crate::error::OAuthError;
use reqwest::Client;
use rust_common::{FormRequest, HttpConfig, build_http_client};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, instrument};

/// Grant type of the JWT-bearer flow (RFC 7523).
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Grant type of the resource-owner-password flow.
pub const PASSWORD_GRANT_TYPE: &str = "password";

/// Client for the provider's token and introspection endpoints.
///
/// Every call is a single form POST; responses are returned as raw JSON.
pub struct OAuthClient {
    http: Client,
    provider: Provider,
}

impl OAuthClient {
    /// Create a client for `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Transport`] if the HTTP client cannot be built.
    pub fn new(provider: Provider, config: &HttpConfig) -> Result<Self, OAuthError> {
        let http = build_http_client(config).map_err(OAuthError::Transport)?;
        Ok(Self::with_client(http, provider))
    }

    /// Create a client reusing an existing HTTP client.
    #[must_use]
    pub const fn with_client(http: Client, provider: Provider) -> Self {
        Self { http, provider }
    }

    /// The provider this client talks to.
    #[must_use]
    pub const fn provider(&self) -> &Provider {
        &self.provider
    }

    /// Token request presenting `assertion` as a JWT-bearer grant.
    /// Client credentials are not sent.
    #[must_use]
    pub fn jwt_bearer_request(&self, assertion: &str) -> FormRequest {
        FormRequest::new(&self.provider.token_url)
            .form_param("grant_type", JWT_BEARER_GRANT_TYPE)
            .form_param("assertion", assertion)
    }

    /// Token request for the resource-owner-password grant, authenticated
    /// with the client credentials.
    #[must_use]
    pub fn password_request(&self, username: &str, password: &str) -> FormRequest {
        FormRequest::new(&self.provider.token_url)
            .form_param("grant_type", PASSWORD_GRANT_TYPE)
            .form_param("username", username)
            .form_param("password", password)
            .basic_auth(
                &self.provider.client_id,
                self.provider.client_secret.expose_secret(),
            )
    }

    /// Introspection request for `token`, authenticated with the client
    /// credentials.
    #[must_use]
    pub fn introspection_request(&self, token: &str) -> FormRequest {
        FormRequest::new(&self.provider.introspect_url)
            .form_param("token", token)
            .basic_auth(
                &self.provider.client_id,
                self.provider.client_secret.expose_secret(),
            )
    }

    /// Exchange a signed assertion for a token.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Transport`] if the endpoint cannot be reached and
    /// [`OAuthError::Decode`] if it does not answer with JSON.
    #[instrument(skip_all, fields(url = %self.provider.token_url))]
    pub async fn exchange_jwt(&self, assertion: &str) -> Result<Value, OAuthError> {
        debug!("Exchanging JWT-bearer assertion");
        Ok(self.jwt_bearer_request(assertion).send_json(&self.http).await?)
    }

    /// Obtain a token with user credentials.
    ///
    /// # Errors
    ///
    /// See [`OAuthClient::exchange_jwt`].
    #[instrument(skip_all, fields(url = %self.provider.token_url))]
    pub async fn password_token(&self, username: &str, password: &str) -> Result<Value, OAuthError> {
        debug!("Requesting resource-owner-password token");
        Ok(self
            .password_request(username, password)
            .send_json(&self.http)
            .await?)
    }

    /// Introspect an access token.
    ///
    /// # Errors
    ///
    /// See [`OAuthClient::exchange_jwt`].
    #[instrument(skip_all, fields(url = %self.provider.introspect_url))]
    pub async fn introspect(&self, token: &str) -> Result<Value, OAuthError> {
        debug!("Introspecting token");
        Ok(self.introspection_request(token).send_json(&self.http).await?)
    }
}
