//! # Configuration
//!
//! privx-secrets reads a TOML file, then lets the environment and the command
//! line override parts of it. The result is one immutable [`Settings`] value
//! that the rest of the crate receives explicitly.
//!
//! ## File format
//!
//! ```toml
//! [api]
//! endpoint = "https://privx.example.com"
//! certificate = """
//! -----BEGIN CERTIFICATE-----
//! ...
//! -----END CERTIFICATE-----
//! """
//!
//! [auth]
//! client_id = "privx-external"
//! client_secret = "..."
//! api_client_id = "..."
//! api_client_secret = "..."
//! ```
//!
//! The capitalised spellings used by older configuration files (`[API]`,
//! `Endpoint`, `[Auth]`, `ClientID`, `APIClientSecret`, ...) are accepted too.
//!
//! ## Precedence
//!
//! 1. Configuration file
//! 2. `OAUTH_CLIENT_ID`, `OAUTH_CLIENT_SECRET`, `API_CLIENT_ID`,
//!    `API_CLIENT_SECRET` environment variables
//! 3. `--api` on the command line

use directories::BaseDirs;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};
use url::Url;

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "privx-secrets.toml";

/// Directory holding the system-wide configuration file, used when the
/// user's home directory cannot be determined.
pub const SYSTEM_CONFIG_DIR: &str = "/opt/etc/privx-secrets";

pub const ENV_OAUTH_CLIENT_ID: &str = "OAUTH_CLIENT_ID";
pub const ENV_OAUTH_CLIENT_SECRET: &str = "OAUTH_CLIENT_SECRET";
pub const ENV_API_CLIENT_ID: &str = "API_CLIENT_ID";
pub const ENV_API_CLIENT_SECRET: &str = "API_CLIENT_SECRET";

/// The configuration file as written on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// API endpoint and transport settings
    #[serde(default, alias = "API")]
    pub api: ApiConfig,
    /// OAuth client credentials
    #[serde(default, alias = "Auth")]
    pub auth: Credentials,
}

/// The `[api]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the PrivX deployment, or a `file://` directory of secret
    /// documents
    #[serde(alias = "Endpoint")]
    pub endpoint: Option<String>,
    /// Additional trusted root certificate, inline PEM
    #[serde(alias = "Certificate")]
    pub certificate: Option<String>,
    /// Additional trusted root certificate, read from a PEM file. Relative
    /// paths are resolved against the configuration file's directory.
    #[serde(alias = "CertificateFile")]
    pub certificate_file: Option<PathBuf>,
}

/// OAuth credentials for the PrivX API.
///
/// The OAuth client identifies this tool; the API client is the account the
/// tool acts as.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(alias = "ClientID")]
    pub client_id: Option<String>,
    #[serde(alias = "ClientSecret")]
    pub client_secret: Option<String>,
    #[serde(alias = "APIClientID")]
    pub api_client_id: Option<String>,
    #[serde(alias = "APIClientSecret")]
    pub api_client_secret: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redacted(secret: &Option<String>) -> Option<&'static str> {
            secret.as_ref().map(|_| "<redacted>")
        }

        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &redacted(&self.client_secret))
            .field("api_client_id", &self.api_client_id)
            .field("api_client_secret", &redacted(&self.api_client_secret))
            .finish()
    }
}

impl ConfigFile {
    /// Gets the default location of the configuration file.
    ///
    /// This is `~/.privx-secrets.toml`, or
    /// `/opt/etc/privx-secrets/privx-secrets.toml` when there is no home
    /// directory.
    pub fn default_path() -> PathBuf {
        match BaseDirs::new() {
            Some(dirs) => dirs.home_dir().join(format!(".{}", CONFIG_FILE_NAME)),
            None => {
                let fallback = Path::new(SYSTEM_CONFIG_DIR).join(CONFIG_FILE_NAME);
                warn!(
                    path = %fallback.display(),
                    "failed to get user's home directory, falling back to system configuration"
                );
                fallback
            }
        }
    }

    /// Loads the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut config: ConfigFile = content.parse()?;

        if let Some(cert_path) = config.api.certificate_file.as_mut() {
            if cert_path.is_relative() {
                if let Some(base) = path.parent() {
                    *cert_path = base.join(&*cert_path);
                }
            }
        }

        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }
}

impl FromStr for ConfigFile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl TryFrom<&Path> for ConfigFile {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        Self::load(path)
    }
}

/// Values given on the command line. These win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--api`
    pub endpoint: Option<String>,
}

/// A trusted root certificate in PEM form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pem: String,
}

impl Certificate {
    /// Accepts `text` if its first PEM block decodes to an X.509 certificate.
    pub fn from_pem(text: &str) -> Result<Self, ConfigError> {
        let undecodable =
            || ConfigError::Certificate("could not decode certificate PEM data".into());

        let certs = rustls_pemfile::certs(&mut text.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| undecodable())?;
        let first = certs.first().ok_or_else(undecodable)?;
        x509_parser::parse_x509_certificate(first.as_ref())
            .map_err(|e| ConfigError::Certificate(format!("could not parse certificate: {}", e)))?;

        Ok(Self {
            pem: text.trim().to_owned(),
        })
    }

    pub fn as_pem(&self) -> &[u8] {
        self.pem.as_bytes()
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where secrets are fetched from; its scheme selects the store
    pub endpoint: Url,
    /// Extra trusted root certificate for HTTPS endpoints
    pub certificate: Option<Certificate>,
    pub credentials: Credentials,
}

impl Settings {
    /// Applies environment and command-line overrides to `file`.
    ///
    /// `env` looks up an environment variable by name, which keeps this
    /// function independent of the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no endpoint is configured, the endpoint is not a
    /// URL, or the certificate is not valid PEM.
    pub fn resolve<F>(file: ConfigFile, env: F, overrides: &Overrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ConfigFile { api, mut auth } = file;

        for (slot, var) in [
            (&mut auth.client_id, ENV_OAUTH_CLIENT_ID),
            (&mut auth.client_secret, ENV_OAUTH_CLIENT_SECRET),
            (&mut auth.api_client_id, ENV_API_CLIENT_ID),
            (&mut auth.api_client_secret, ENV_API_CLIENT_SECRET),
        ] {
            if let Some(value) = env(var) {
                debug!(var, "credential overridden from environment");
                *slot = Some(value);
            }
        }

        let endpoint = overrides
            .endpoint
            .clone()
            .filter(|endpoint| !endpoint.is_empty())
            .or(api.endpoint)
            .filter(|endpoint| !endpoint.is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;
        let endpoint =
            Url::parse(&endpoint).map_err(|e| ConfigError::InvalidEndpoint(endpoint.clone(), e))?;

        let certificate = match (api.certificate, api.certificate_file) {
            (Some(pem), _) => Some(Certificate::from_pem(&pem)?),
            (None, Some(path)) => Some(Certificate::from_pem(&fs::read_to_string(path)?)?),
            (None, None) => None,
        };

        Ok(Self {
            endpoint,
            certificate,
            credentials: auth,
        })
    }

    /// [`Settings::resolve`] against the process environment.
    pub fn from_process_env(file: ConfigFile, overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::resolve(file, |name| env::var(name).ok(), overrides)
    }
}

/// Errors that can occur when loading and resolving configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error when reading the configuration or certificate file
    Io(io::Error),
    /// TOML parsing error
    Toml(toml::de::Error),
    /// No endpoint in the file or on the command line
    MissingEndpoint,
    /// The endpoint is not a URL
    InvalidEndpoint(String, url::ParseError),
    /// The certificate is not PEM
    Certificate(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Toml(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::MissingEndpoint => write!(f, "no API endpoint configured"),
            ConfigError::InvalidEndpoint(endpoint, e) => {
                write!(f, "invalid API endpoint '{}': {}", endpoint, e)
            }
            ConfigError::Certificate(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Toml(e) => Some(e),
            ConfigError::InvalidEndpoint(_, e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Toml(e)
    }
}
