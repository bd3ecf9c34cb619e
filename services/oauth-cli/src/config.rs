//! Provider configuration and its on-disk store.
//!
//! The configuration lives in `~/.oauth/providers.yaml` under a top-level
//! `configuration` key. Values from the file can be overridden through
//! environment variables such as `OAUTH_CONFIGURATION__PROVIDER__TOKENURL`.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Directory under the home directory holding the configuration file.
pub const CONFIG_DIR: &str = ".oauth";

/// Configuration file name.
pub const CONFIG_FILE: &str = "providers.yaml";

/// Prefix of environment variables overriding file values.
pub const ENV_PREFIX: &str = "OAUTH";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The home directory could not be determined
    #[error("Unable to locate the home directory")]
    HomeDirUnavailable,

    /// The configuration file does not exist
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The configuration file could not be read or decoded
    #[error("Error reading config file {}: {source}", path.display())]
    Load {
        /// Configuration file path
        path: PathBuf,
        /// Underlying loader error
        #[source]
        source: ::config::ConfigError,
    },

    /// The configuration file could not be written
    #[error("Error writing config file {}: {source}", path.display())]
    Write {
        /// Configuration file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be encoded as YAML
    #[error("Unable to encode configuration: {0}")]
    Encode(#[from] serde_yaml::Error),
}

/// OAuth2 provider endpoints and client credentials.
///
/// Field names on disk are lowercase (`clientid`, `tokenurl`, ...). Missing
/// fields decode as empty strings.
#[derive(Debug, Serialize, Deserialize)]
pub struct Provider {
    /// Display name of the identity provider
    #[serde(default)]
    pub name: String,
    /// OAuth2 client identifier
    #[serde(rename = "clientid", default)]
    pub client_id: String,
    /// OAuth2 client secret
    #[serde(
        rename = "clientsecret",
        default = "empty_secret",
        serialize_with = "serialize_secret",
        deserialize_with = "deserialize_secret"
    )]
    pub client_secret: SecretString,
    /// Token endpoint
    #[serde(rename = "tokenurl", default)]
    pub token_url: String,
    /// Introspection endpoint
    #[serde(rename = "introspecturl", default)]
    pub introspect_url: String,
    /// Issuer URL, used as the audience of JWT-bearer assertions
    #[serde(rename = "issuerurl", default)]
    pub issuer_url: String,
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn deserialize_secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

impl Provider {
    /// Create a provider with the given name and no endpoints.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client_id: String::new(),
            client_secret: empty_secret(),
            token_url: String::new(),
            introspect_url: String::new(),
            issuer_url: String::new(),
        }
    }

    /// Set the client credentials.
    #[must_use]
    pub fn with_client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = client_id.into();
        self.client_secret = SecretString::from(client_secret.into());
        self
    }

    /// Set the token endpoint.
    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Set the introspection endpoint.
    #[must_use]
    pub fn with_introspect_url(mut self, url: impl Into<String>) -> Self {
        self.introspect_url = url.into();
        self
    }

    /// Set the issuer URL.
    #[must_use]
    pub fn with_issuer_url(mut self, url: impl Into<String>) -> Self {
        self.issuer_url = url.into();
        self
    }
}

/// Root of the configuration document.
#[derive(Debug, Serialize, Deserialize)]
pub struct Configuration {
    /// The configured identity provider
    pub provider: Provider,
}

impl Configuration {
    /// Configuration written on first use: the HSDP IAM test environment
    /// with placeholder client credentials.
    #[must_use]
    pub fn hsdp_default() -> Self {
        Self {
            provider: Provider::new("HSDP")
                .with_client_credentials("<clientId>", "<clientsecret>")
                .with_token_url(
                    "https://iam-client-test.us-east.philips-healthsuite.com/authorize/oauth2/token?api-version=2",
                )
                .with_introspect_url(
                    "https://iam-client-test.us-east.philips-healthsuite.com/authorize/oauth2/introspect?api-version=3",
                )
                .with_issuer_url(
                    "https://iam-client-test.us-east.philips-healthsuite.com/oauth2/access_token",
                ),
        }
    }
}

#[derive(Serialize)]
struct Document<'a> {
    configuration: &'a Configuration,
}

/// Reads and writes the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by an explicit file.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.oauth/providers.yaml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HomeDirUnavailable`] if there is no home directory.
    pub fn default_location() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirUnavailable)?;
        Ok(Self::at(home.join(CONFIG_DIR).join(CONFIG_FILE)))
    }

    /// Path of the configuration file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the configuration file exists (directories do not count).
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the configuration, applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file is missing and
    /// [`ConfigError::Load`] if it cannot be read or decoded.
    pub fn load(&self) -> Result<Configuration, ConfigError> {
        self.load_with_env(env_overrides())
    }

    /// Load the configuration, taking overrides from `env` instead of the
    /// process environment.
    ///
    /// # Errors
    ///
    /// See [`ConfigStore::load`].
    pub fn load_with_env(&self, env: ::config::Environment) -> Result<Configuration, ConfigError> {
        if !self.exists() {
            return Err(ConfigError::NotFound(self.path.clone()));
        }

        let load_error = |source| ConfigError::Load {
            path: self.path.clone(),
            source,
        };

        let settings = ::config::Config::builder()
            .add_source(
                ::config::File::from(self.path.as_path()).format(::config::FileFormat::Yaml),
            )
            .add_source(env)
            .build()
            .map_err(load_error)?;

        let configuration: Configuration = settings.get("configuration").map_err(load_error)?;
        debug!(path = %self.path.display(), provider = %configuration.provider.name, "Loaded configuration");
        Ok(configuration)
    }

    /// Write `configuration` to the file, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Encode`] or [`ConfigError::Write`].
    pub fn write(&self, configuration: &Configuration) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(write_error)?;
        }

        let yaml = serde_yaml::to_string(&Document { configuration })?;
        fs::write(&self.path, yaml).map_err(write_error)?;
        restrict_permissions(&self.path).map_err(write_error)?;
        Ok(())
    }

    /// Write the default configuration.
    ///
    /// # Errors
    ///
    /// See [`ConfigStore::write`].
    pub fn write_default(&self) -> Result<(), ConfigError> {
        self.write(&Configuration::hsdp_default())
    }

    /// Write the default configuration unless a file already exists.
    /// Returns whether a file was written.
    ///
    /// # Errors
    ///
    /// See [`ConfigStore::write`].
    pub fn ensure_exists(&self) -> Result<bool, ConfigError> {
        if self.exists() {
            return Ok(false);
        }
        self.write_default()?;
        info!(path = %self.path.display(), "Wrote default configuration");
        Ok(true)
    }
}

/// Environment source mapping `OAUTH_CONFIGURATION__PROVIDER__TOKENURL` to
/// `configuration.provider.tokenurl`.
#[must_use]
pub fn env_overrides() -> ::config::Environment {
    ::config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
