//! OAuth access tokens for the PrivX API.
//!
//! PrivX issues tokens through a password grant: the API client's id and
//! secret are the username and password, and the OAuth client's id and secret
//! authenticate the request itself with HTTP basic auth.

use crate::config::{
    Credentials, ENV_API_CLIENT_ID, ENV_API_CLIENT_SECRET, ENV_OAUTH_CLIENT_ID,
    ENV_OAUTH_CLIENT_SECRET,
};
use crate::{PrivxError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

const TOKEN_PATH: &str = "auth/api/v1/oauth/token";

/// Tokens closer than this to expiry are renewed before use.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Clone)]
struct AccessToken {
    value: String,
    expires_at: Option<Instant>,
}

impl AccessToken {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at
            .is_none_or(|expires_at| now + EXPIRY_MARGIN < expires_at)
    }
}

/// Acquires and caches an access token for one endpoint.
pub struct OAuthClient {
    http: Client,
    token_url: Url,
    credentials: Credentials,
    token: Mutex<Option<AccessToken>>,
}

impl OAuthClient {
    pub fn new(http: Client, endpoint: &Url, credentials: Credentials) -> Result<Self> {
        Ok(Self {
            http,
            token_url: api_url(endpoint, TOKEN_PATH)?,
            credentials,
            token: Mutex::new(None),
        })
    }

    /// Returns a valid access token, requesting a new one if none is cached
    /// or the cached one is about to expire.
    ///
    /// # Errors
    ///
    /// Returns [`PrivxError::MissingCredential`] if a credential is not
    /// configured, and [`PrivxError::Authentication`] if the server refuses
    /// the grant.
    pub fn access_token(&self) -> Result<String> {
        let mut cached = self
            .token
            .lock()
            .map_err(|_| PrivxError::Authentication("token cache poisoned".into()))?;

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(token.value.clone());
        }

        let token = self.request_token()?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    fn request_token(&self) -> Result<AccessToken> {
        let client_id = required(&self.credentials.client_id, "client_id", ENV_OAUTH_CLIENT_ID)?;
        let client_secret = required(
            &self.credentials.client_secret,
            "client_secret",
            ENV_OAUTH_CLIENT_SECRET,
        )?;
        let api_client_id = required(
            &self.credentials.api_client_id,
            "api_client_id",
            ENV_API_CLIENT_ID,
        )?;
        let api_client_secret = required(
            &self.credentials.api_client_secret,
            "api_client_secret",
            ENV_API_CLIENT_SECRET,
        )?;

        debug!(url = %self.token_url, "requesting access token");
        let requested_at = Instant::now();
        let response = self
            .http
            .post(self.token_url.clone())
            .basic_auth(client_id, Some(client_secret))
            .form(&[
                ("grant_type", "password"),
                ("username", api_client_id),
                ("password", api_client_secret),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PrivxError::Authentication(format!(
                "{}: {}",
                status,
                body.trim()
            )));
        }

        let token: TokenResponse = response.json()?;
        if let Some(kind) = &token.token_type {
            if !kind.eq_ignore_ascii_case("bearer") {
                return Err(PrivxError::Authentication(format!(
                    "unsupported token type '{}'",
                    kind
                )));
            }
        }

        debug!(expires_in = ?token.expires_in, "access token acquired");
        Ok(AccessToken {
            value: token.access_token,
            expires_at: token
                .expires_in
                .map(|secs| requested_at + Duration::from_secs(secs)),
        })
    }
}

fn required<'a>(
    value: &'a Option<String>,
    key: &'static str,
    env: &'static str,
) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(PrivxError::MissingCredential { key, env })
}

/// Joins `path` onto the API endpoint, keeping any path prefix the endpoint
/// already has.
pub(crate) fn api_url(endpoint: &Url, path: &str) -> Result<Url> {
    let mut base = endpoint.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path)?)
}
