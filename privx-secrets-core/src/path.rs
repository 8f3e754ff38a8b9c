//! Key expressions and path resolution.
//!
//! A key expression names a secret, optionally asks for its value to be
//! assigned to a shell variable, and walks into the secret's data:
//!
//! ```text
//! [ENVNAME=]NAME[.SEGMENT...]
//! ```
//!
//! The first segment is the secret name and is consumed by the store fetch.
//! The remaining segments are looked up here, one member at a time.

use crate::error::{RenderError, Result};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: &str = ".";

/// A location inside a secret, used to give errors path context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trail {
    segments: Vec<String>,
    separator: String,
}

impl Trail {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            segments: Vec::new(),
            separator: separator.into(),
        }
    }

    pub fn from_segments(segments: &[String], separator: impl Into<String>) -> Self {
        Self {
            segments: segments.to_vec(),
            separator: separator.into(),
        }
    }

    /// Returns the trail one member deeper.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_owned());
        Self {
            segments,
            separator: self.separator.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl fmt::Display for Trail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(&self.separator))
    }
}

/// A parsed key expression.
///
/// An expression with an `ENVNAME=` prefix is in assignment mode and renders
/// shell assignments; one without is in display mode and renders the value
/// itself.
///
/// # Example
///
/// ```
/// use privx_secrets_core::PathExpression;
///
/// let expr = PathExpression::parse("cred=secret.db.host", ".").unwrap();
/// assert_eq!(expr.env_name(), Some("cred"));
/// assert_eq!(expr.secret_name(), "secret");
/// assert_eq!(expr.segments(), ["secret", "db", "host"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    raw: String,
    env_name: Option<String>,
    segments: Vec<String>,
    separator: String,
}

impl PathExpression {
    /// Parses `raw` using `separator` between segments.
    ///
    /// The `=` is only honoured inside the first segment and only when the
    /// text before it is non-empty; `=name` is a secret called `=name`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Configuration`] if the separator or the
    /// expression is empty, or if no secret name remains after removing the
    /// variable name.
    pub fn parse(raw: &str, separator: &str) -> Result<Self> {
        if separator.is_empty() {
            return Err(RenderError::Configuration(
                "separator must not be empty".into(),
            ));
        }
        if raw.is_empty() {
            return Err(RenderError::Configuration(
                "key expression must not be empty".into(),
            ));
        }

        let mut segments: Vec<String> = raw.split(separator).map(str::to_owned).collect();
        let mut env_name = None;
        if let Some((env, name)) = segments[0].split_once('=') {
            if !env.is_empty() {
                env_name = Some(env.to_owned());
                segments[0] = name.to_owned();
            }
        }

        if segments[0].is_empty() {
            return Err(RenderError::Configuration(format!(
                "key expression '{}' does not name a secret",
                raw
            )));
        }

        Ok(Self {
            raw: raw.to_owned(),
            env_name,
            segments,
            separator: separator.to_owned(),
        })
    }

    /// The expression as given on the command line.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn env_name(&self) -> Option<&str> {
        self.env_name.as_deref()
    }

    pub fn is_assignment(&self) -> bool {
        self.env_name.is_some()
    }

    /// Name of the secret to fetch from the store.
    pub fn secret_name(&self) -> &str {
        &self.segments[0]
    }

    /// All segments, starting with the secret name.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Trail naming the full location this expression points at.
    pub fn trail(&self) -> Trail {
        Trail::from_segments(&self.segments, self.separator.clone())
    }

    /// Walks this expression's segments through the secret's data.
    pub fn resolve<'a>(&self, data: &'a Value) -> Result<&'a Value> {
        resolve(data, &self.segments, &self.separator)
    }
}

impl FromStr for PathExpression {
    type Err = RenderError;

    /// Parses with [`DEFAULT_SEPARATOR`].
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, DEFAULT_SEPARATOR)
    }
}

/// Resolves `segments[1..]` starting at `root`.
///
/// `root` is the data of the secret named by `segments[0]`; that segment only
/// appears in error paths.
///
/// # Errors
///
/// - [`RenderError::NotFound`] when a member is absent, with the path up to
///   and including the missing segment.
/// - [`RenderError::TypeMismatch`] when a segment would index into a
///   non-object, with the path of that node and the offending segment.
pub fn resolve<'a>(root: &'a Value, segments: &[String], separator: &str) -> Result<&'a Value> {
    let mut current = root;
    for (i, segment) in segments.iter().enumerate().skip(1) {
        current = match current {
            Value::Compound(members) => {
                members
                    .get(segment)
                    .ok_or_else(|| RenderError::NotFound {
                        path: segments[..=i].join(separator),
                    })?
            }
            other => {
                return Err(RenderError::TypeMismatch {
                    path: segments[..i].join(separator),
                    segment: segment.clone(),
                    shape: other.shape_name(),
                });
            }
        };
    }
    Ok(current)
}
