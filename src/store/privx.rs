use super::SecretStore;
use crate::auth::{OAuthClient, api_url};
use crate::config::{Certificate, Credentials, Settings};
use crate::{PrivxError, Result};
use privx_secrets_core::Document;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

const SECRETS_PATH: &str = "vault/api/v1/secrets/";

/// Configuration for the PrivX vault store.
///
/// Taken from the resolved [`Settings`]; the endpoint must be an `https` or
/// `http` URL.
#[derive(Debug, Clone)]
pub struct PrivxConfig {
    /// Base URL of the PrivX deployment
    pub endpoint: Url,
    /// Extra trusted root certificate
    pub certificate: Option<Certificate>,
    /// OAuth credentials
    pub credentials: Credentials,
}

impl TryFrom<&Settings> for PrivxConfig {
    type Error = PrivxError;

    fn try_from(settings: &Settings) -> std::result::Result<Self, Self::Error> {
        let scheme = settings.endpoint.scheme();
        if scheme != "https" && scheme != "http" {
            return Err(PrivxError::StoreOperationFailed(format!(
                "Invalid scheme '{}' for privx store",
                scheme
            )));
        }

        Ok(Self {
            endpoint: settings.endpoint.clone(),
            certificate: settings.certificate.clone(),
            credentials: settings.credentials.clone(),
        })
    }
}

/// Fetches secrets from a PrivX vault.
///
/// Each fetch is a `GET <endpoint>/vault/api/v1/secrets/<name>` carrying a
/// bearer token. The token is acquired on first use and reused until it is
/// about to expire.
pub struct PrivxStore {
    http: Client,
    oauth: OAuthClient,
    secrets_url: Url,
}

crate::register_store! {
    PrivxStore(PrivxConfig) {
        name: "privx",
        description: "PrivX vault over HTTPS (OAuth client credentials)",
        schemes: ["https", "http"],
        examples: ["https://privx.example.com"],
    }
}

impl PrivxStore {
    /// Builds the HTTP client, trusting the configured certificate in
    /// addition to the system roots.
    pub fn new(config: PrivxConfig) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("privx-secrets/", env!("CARGO_PKG_VERSION")));
        if let Some(certificate) = &config.certificate {
            builder =
                builder.add_root_certificate(reqwest::Certificate::from_pem(certificate.as_pem())?);
        }
        let http = builder.build()?;

        Ok(Self {
            oauth: OAuthClient::new(http.clone(), &config.endpoint, config.credentials)?,
            secrets_url: api_url(&config.endpoint, SECRETS_PATH)?,
            http,
        })
    }

    fn secret_url(&self, name: &str) -> Result<Url> {
        let mut url = self.secrets_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PrivxError::StoreOperationFailed(format!(
                    "endpoint '{}' cannot carry a path",
                    self.secrets_url
                ))
            })?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }
}

impl SecretStore for PrivxStore {
    fn fetch(&self, name: &str) -> Result<Document> {
        let token = self.oauth.access_token()?;
        let url = self.secret_url(name)?;

        debug!(%url, "fetching secret");
        let response = self.http.get(url).bearer_auth(token).send()?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json()?)
        } else if status == StatusCode::NOT_FOUND {
            Err(PrivxError::SecretNotFound(name.to_string()))
        } else {
            let body = response.text().unwrap_or_default();
            Err(PrivxError::StoreOperationFailed(format!(
                "{}: {}",
                status,
                body.trim()
            )))
        }
    }

    fn authenticate(&self) -> Result<()> {
        self.oauth.access_token().map(|_| ())
    }

    fn name(&self) -> &'static str {
        Self::INFO.name
    }
}
