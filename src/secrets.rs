//! Fetching secrets and rendering key expressions against them

use crate::config::Settings;
use crate::error::{PrivxError, Result};
use crate::store::SecretStore;
use privx_secrets_core::{DEFAULT_SEPARATOR, Dialect, PathExpression, RenderRequest, Value};
use std::convert::TryFrom;
use std::io::Write;
use tracing::debug;

/// How the keys of a `get` are parsed and rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOptions {
    /// Separator between the segments of a key expression
    pub separator: String,
    /// Spread compound values into one assignment per leaf
    pub spread: bool,
    /// Shell dialect for assignment-mode keys
    pub dialect: Dialect,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            spread: false,
            dialect: Dialect::Plain,
        }
    }
}

/// The main entry point for the privx-secrets library
///
/// `Secrets` fetches secret documents from a [`SecretStore`] and renders key
/// expressions against their data.
///
/// # Example
///
/// ```no_run
/// use privx_secrets::{ConfigFile, GetOptions, Overrides, Secrets, Settings};
/// use std::path::Path;
///
/// let file = ConfigFile::load(Path::new("/etc/privx-secrets.toml")).unwrap();
/// let settings = Settings::from_process_env(file, &Overrides::default()).unwrap();
/// let secrets = Secrets::from_settings(&settings).unwrap();
///
/// let keys = vec!["DB_PASSWORD=database.password".to_string()];
/// secrets
///     .get(&keys, &GetOptions::default(), &mut std::io::stdout())
///     .unwrap();
/// ```
pub struct Secrets {
    store: Box<dyn SecretStore>,
}

impl Secrets {
    pub fn new(store: Box<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Creates the store selected by the settings' endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if no store handles the endpoint scheme or the store
    /// cannot be set up.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(Box::<dyn SecretStore>::try_from(settings)?))
    }

    /// Name of the store in use.
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Fetches the secret `name` and returns its `data` member.
    ///
    /// # Errors
    ///
    /// Returns [`PrivxError::NoData`] if the store's response has no `data`
    /// member, and any store error as is.
    pub fn data(&self, name: &str) -> Result<Value> {
        let mut document = self.store.fetch(name)?;
        document
            .remove("data")
            .ok_or_else(|| PrivxError::NoData(name.to_string()))
    }

    /// Renders every key in `keys` and writes the output to `out`.
    ///
    /// All keys are parsed before anything is fetched, so a malformed key or
    /// an invalid option combination fails without output. Keys are then
    /// processed in order; the first failure stops processing, leaving the
    /// output of earlier keys written.
    ///
    /// # Errors
    ///
    /// Returns [`PrivxError::Secret`] naming the key that failed, with the
    /// underlying error as its source.
    pub fn get<W: Write>(&self, keys: &[String], options: &GetOptions, out: &mut W) -> Result<()> {
        let requests = keys
            .iter()
            .map(|key| {
                Self::request(key, options).map_err(|source| with_key(key, source))
            })
            .collect::<Result<Vec<_>>>()?;

        for (key, request) in keys.iter().zip(&requests) {
            self.render(request, out)
                .map_err(|source| with_key(key, source))?;
        }
        Ok(())
    }

    /// Acquires credentials with the store.
    pub fn login(&self) -> Result<()> {
        self.store.authenticate()
    }

    fn request(key: &str, options: &GetOptions) -> Result<RenderRequest> {
        let expression = PathExpression::parse(key, &options.separator)?;
        Ok(RenderRequest::new(
            expression,
            options.spread,
            options.dialect,
        )?)
    }

    fn render<W: Write>(&self, request: &RenderRequest, out: &mut W) -> Result<()> {
        let expression = request.expression();
        let data = self.data(expression.secret_name())?;
        let lines = request.render(&data)?;

        debug!(
            key = expression.raw(),
            lines = lines.len(),
            "rendered secret"
        );
        for line in &lines {
            out.write_all(line.as_bytes())?;
        }
        out.flush()?;
        Ok(())
    }
}

fn with_key(key: &str, source: PrivxError) -> PrivxError {
    PrivxError::Secret {
        key: key.to_string(),
        source: Box::new(source),
    }
}
