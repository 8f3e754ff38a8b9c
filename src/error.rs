//! Error types for privx-secrets operations

use crate::config::ConfigError;
use privx_secrets_core::RenderError;
use std::io;
use thiserror::Error;

/// The main error type for privx-secrets operations
///
/// This enum represents all possible errors that can occur when fetching
/// and rendering secrets.
#[derive(Error, Debug)]
pub enum PrivxError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(
        "No API endpoint configured.\n\nTo fix this, either:\n  1. Set 'endpoint' in the [api] section of the configuration file\n  2. Use the --api flag (e.g., 'privx-secrets --api https://privx.example.com get ...')"
    )]
    NoEndpoint,
    #[error("Invalid API endpoint '{0}': {1}")]
    InvalidEndpoint(String, url::ParseError),
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),
    #[error(
        "OAuth credential '{key}' is not configured. Set it in the [auth] section of the configuration file or in the {env} environment variable"
    )]
    MissingCredential {
        key: &'static str,
        env: &'static str,
    },
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("No secret store handles '{0}' endpoints")]
    StoreNotFound(String),
    #[error("Secret store operation failed: {0}")]
    StoreOperationFailed(String),
    #[error("Secret '{0}' not found")]
    SecretNotFound(String),
    #[error("no 'data' in vault response for secret '{0}'")]
    NoData(String),
    #[error("failed to get secret '{key}'")]
    Secret {
        key: String,
        #[source]
        source: Box<PrivxError>,
    },
}

/// A type alias for `Result<T, PrivxError>`
///
/// This provides a convenient shorthand for functions that return
/// a result with a `PrivxError` as the error type.
pub type Result<T> = std::result::Result<T, PrivxError>;

impl From<ConfigError> for PrivxError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io_err) => PrivxError::Io(io_err),
            ConfigError::Toml(toml_err) => PrivxError::Toml(toml_err),
            ConfigError::MissingEndpoint => PrivxError::NoEndpoint,
            ConfigError::InvalidEndpoint(endpoint, url_err) => {
                PrivxError::InvalidEndpoint(endpoint, url_err)
            }
            ConfigError::Certificate(msg) => PrivxError::InvalidCertificate(msg),
        }
    }
}
