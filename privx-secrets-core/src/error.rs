//! Error types for resolving and rendering secret documents

use thiserror::Error;

/// Errors raised while resolving a path or rendering a value.
///
/// Every variant that can point at a location carries the path consumed so
/// far, joined with the separator of the request that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("element '{path}' not found")]
    NotFound { path: String },
    #[error("can't index {shape} '{path}' with '{segment}'")]
    TypeMismatch {
        path: String,
        segment: String,
        shape: &'static str,
    },
    #[error("can't render {shape} at '{path}': only strings and objects are supported")]
    UnsupportedType { path: String, shape: &'static str },
    #[error("cannot spread bare scalar '{path}' with no name context")]
    InvalidSpread { path: String },
    #[error("{0}")]
    Configuration(String),
}

/// A type alias for `Result<T, RenderError>`
pub type Result<T> = std::result::Result<T, RenderError>;
