use super::SecretStore;
use crate::config::Settings;
use crate::{PrivxError, Result};
use privx_secrets_core::Document;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// Configuration for the file store.
///
/// # Example
///
/// ```ignore
/// # use url::Url;
/// # use privx_secrets::store::FileConfig;
/// let url = Url::parse("file:///var/lib/privx-secrets").unwrap();
/// let config: FileConfig = (&url).try_into().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileConfig {
    /// Directory holding one `<name>.json` document per secret
    pub root: PathBuf,
}

impl TryFrom<&Url> for FileConfig {
    type Error = PrivxError;

    fn try_from(url: &Url) -> std::result::Result<Self, Self::Error> {
        if url.scheme() != "file" {
            return Err(PrivxError::StoreOperationFailed(format!(
                "Invalid scheme '{}' for file store",
                url.scheme()
            )));
        }

        let root = url.to_file_path().map_err(|_| {
            PrivxError::StoreOperationFailed(format!("'{}' is not a local directory", url))
        })?;
        Ok(Self { root })
    }
}

impl TryFrom<&Settings> for FileConfig {
    type Error = PrivxError;

    fn try_from(settings: &Settings) -> std::result::Result<Self, Self::Error> {
        Self::try_from(&settings.endpoint)
    }
}

/// A read-only store backed by a directory of JSON documents.
///
/// The secret `name` lives in `<root>/<name>.json`, which holds the same
/// document a vault would return, `data` member included. Useful offline and
/// in tests.
pub struct FileStore {
    config: FileConfig,
}

crate::register_store! {
    FileStore(FileConfig) {
        name: "file",
        description: "Directory of JSON secret documents (read-only)",
        schemes: ["file"],
        examples: ["file:///var/lib/privx-secrets"],
    }
}

impl FileStore {
    pub fn new(config: FileConfig) -> Result<Self> {
        if !config.root.is_dir() {
            return Err(PrivxError::StoreOperationFailed(format!(
                "secret directory '{}' does not exist",
                config.root.display()
            )));
        }
        Ok(Self { config })
    }

    fn document_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(PrivxError::StoreOperationFailed(format!(
                "invalid secret name '{}'",
                name
            )));
        }
        Ok(self.config.root.join(format!("{}.json", name)))
    }
}

impl SecretStore for FileStore {
    fn fetch(&self, name: &str) -> Result<Document> {
        let path = self.document_path(name)?;
        debug!(path = %path.display(), "reading secret document");

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PrivxError::SecretNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    fn name(&self) -> &'static str {
        Self::INFO.name
    }
}
