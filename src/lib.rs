//! privx-secrets - PrivX vault secrets for shells
//!
//! This library fetches secrets from a PrivX vault and turns them into text a
//! shell can consume: the plain value, or `NAME=value` assignments in POSIX,
//! C-shell or plain syntax.
//!
//! # Features
//!
//! - **Key expressions**: `[ENVNAME=]NAME[.SEGMENT...]` walks into a secret's data
//! - **Spread**: export every leaf of a nested secret as its own variable
//! - **Shell dialects**: Bourne (`-s`), C-shell (`-c`) or plain assignments
//! - **Stores**: PrivX over HTTPS with OAuth, or a local directory of documents
//!
//! # Example
//!
//! ```ignore
//! let file = ConfigFile::load(&ConfigFile::default_path())?;
//! let settings = Settings::from_process_env(file, &Overrides::default())?;
//! let secrets = Secrets::from_settings(&settings)?;
//!
//! // Prints: DB_HOST="db.internal"; export DB_HOST; ...
//! let options = GetOptions { spread: true, dialect: Dialect::Bourne, ..Default::default() };
//! secrets.get(&["DB=database.primary".to_string()], &options, &mut std::io::stdout())?;
//! ```

mod auth;
pub mod config;
mod error;
mod secrets;
pub mod store;

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

pub use config::{ConfigError, ConfigFile, Credentials, Overrides, Settings};
pub use error::{PrivxError, Result};
pub use secrets::{GetOptions, Secrets};

// Re-export the rendering core for library users
pub use privx_secrets_core::{Dialect, Document, PathExpression, RenderError, Value};
