//! # Secret Stores
//!
//! A secret store fetches secret documents by name. The configured endpoint
//! decides which store is used: every store registers the URL schemes it
//! handles, and the endpoint's scheme picks one of them.
//!
//! ## Available Stores
//!
//! - [`PrivxStore`]: PrivX vault over HTTPS, authenticated with OAuth
//! - [`FileStore`]: a local directory of JSON secret documents (read-only)
//!
//! ## Example
//!
//! ```rust,ignore
//! use privx_secrets::store::SecretStore;
//!
//! let store = Box::<dyn SecretStore>::try_from(&settings)?;
//! let document = store.fetch("database")?;
//! println!("{:?}", document.get("data"));
//! ```

use crate::config::Settings;
use crate::{PrivxError, Result};
use privx_secrets_core::Document;
use tracing::debug;

pub mod file;
#[macro_use]
pub mod macros;
pub mod privx;

#[cfg(test)]
pub(crate) mod tests;

pub use file::{FileConfig, FileStore};
pub use privx::{PrivxConfig, PrivxStore};

/// Information about a secret store.
///
/// Contains metadata used for listing the stores a build supports.
#[derive(Debug, Clone)]
pub struct StoreInfo {
    /// The canonical name of the store (e.g., "privx", "file").
    pub name: &'static str,
    /// A human-readable description of what the store does.
    pub description: &'static str,
    /// Example endpoints selecting this store.
    pub examples: &'static [&'static str],
}

impl StoreInfo {
    /// Formats the store information for display, including examples if available.
    ///
    /// # Returns
    ///
    /// A formatted string in one of two formats:
    /// - Without examples: "name: description"
    /// - With examples: "name: description (e.g., example1, example2)"
    pub fn display_with_examples(&self) -> String {
        if self.examples.is_empty() {
            format!("{}: {}", self.name, self.description)
        } else {
            format!(
                "{}: {} (e.g., {})",
                self.name,
                self.description,
                self.examples.join(", ")
            )
        }
    }
}

/// Macro support types
pub use macros::{STORE_REGISTRY, StoreFactory, StoreRegistration};

/// Returns all registered stores with their metadata.
pub fn stores() -> Vec<StoreInfo> {
    STORE_REGISTRY.iter().map(|reg| reg.info.clone()).collect()
}

/// Trait defining the interface for secret stores.
///
/// Stores are read-only from this crate's point of view: they hand out
/// documents and never modify them.
///
/// # Thread Safety
///
/// Stores must be `Send + Sync`.
pub trait SecretStore: Send + Sync {
    /// Fetches the secret document called `name`.
    ///
    /// The document is the store's full response; its `data` member holds the
    /// secret's value tree.
    ///
    /// # Errors
    ///
    /// Returns [`PrivxError::SecretNotFound`] if the store has no such secret,
    /// or another error if the store cannot be reached or answers with
    /// something that is not a JSON object.
    fn fetch(&self, name: &str) -> Result<Document>;

    /// Establishes credentials with the store without fetching anything.
    ///
    /// Stores that need no credentials keep the default, which succeeds.
    fn authenticate(&self) -> Result<()> {
        Ok(())
    }

    /// Returns the name of this store.
    ///
    /// Stores registered with `register_store!` return `Self::INFO.name`.
    fn name(&self) -> &'static str;
}

impl TryFrom<&Settings> for Box<dyn SecretStore> {
    type Error = PrivxError;

    /// Creates the store that handles the settings' endpoint scheme.
    fn try_from(settings: &Settings) -> Result<Self> {
        let scheme = settings.endpoint.scheme();

        let registration = STORE_REGISTRY
            .iter()
            .find(|reg| reg.schemes.contains(&scheme))
            .ok_or_else(|| PrivxError::StoreNotFound(scheme.to_string()))?;

        debug!(
            store = registration.info.name,
            endpoint = %settings.endpoint,
            "selected secret store"
        );
        (registration.factory)(settings)
    }
}
