//! # PrivX Secrets Core
//!
//! Turns the data of a PrivX vault secret into text a shell can consume.
//!
//! A secret's data is a tree of objects and strings ([`Value`]). A key
//! expression ([`PathExpression`]) picks a node in that tree; the node is
//! then either flattened into one token ([`flatten`]) or spread into one
//! variable per leaf ([`spread`]), and finally written as an assignment in
//! one of the supported shell dialects ([`Dialect`]).
//!
//! ```
//! use privx_secrets_core::{Dialect, PathExpression, RenderRequest, Value};
//!
//! let data: Value = [("user", "alice"), ("pass", "s3cr3t")].into_iter().collect();
//! let expr = PathExpression::parse("cred=secret.user", ".").unwrap();
//! let request = RenderRequest::new(expr, false, Dialect::Plain).unwrap();
//! assert_eq!(request.render(&data).unwrap(), ["cred=\"alice\"\n"]);
//! ```
//!
//! Nothing in this crate performs I/O or reads the environment.

mod error;
mod flatten;
mod path;
mod render;
mod shell;
mod spread;
mod value;

pub use error::{RenderError, Result};
pub use flatten::{flatten, flatten_within};
pub use path::{DEFAULT_SEPARATOR, PathExpression, Trail, resolve};
pub use render::RenderRequest;
pub use shell::{Dialect, format_assignment};
pub use spread::{Leaf, NAME_JOINER, spread, spread_within};
pub use value::{Document, Shape, Value};
