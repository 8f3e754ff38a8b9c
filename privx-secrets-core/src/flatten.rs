//! Rendering a value as a single token.

use crate::error::{RenderError, Result};
use crate::path::Trail;
use crate::spread::double_quote;
use crate::value::Value;

/// Renders `value` as one string.
///
/// Objects become `{key=value,...}`. With `all_mode` false (display), a
/// top-level string is printed bare and nested strings are quoted so the
/// braces stay unambiguous. With `all_mode` true (the right-hand side of a
/// shell assignment) every string is quoted and a top-level object is
/// wrapped in one more pair of quotes.
///
/// Start with `level` 0; recursion increments it.
///
/// ```
/// use privx_secrets_core::{Value, flatten};
///
/// assert_eq!(flatten(&Value::from("x"), false, 0).unwrap(), "x");
/// assert_eq!(flatten(&Value::from("x"), true, 0).unwrap(), "\"x\"");
/// ```
pub fn flatten(value: &Value, all_mode: bool, level: usize) -> Result<String> {
    flatten_within(value, all_mode, level, &Trail::default())
}

/// Like [`flatten`], reporting errors relative to `trail`.
pub fn flatten_within(value: &Value, all_mode: bool, level: usize, trail: &Trail) -> Result<String> {
    match value {
        Value::Compound(members) => {
            let rendered = members
                .iter()
                .map(|(key, child)| {
                    flatten_within(child, all_mode, level + 1, &trail.child(key))
                        .map(|child| format!("{}={}", key, child))
                })
                .collect::<Result<Vec<_>>>()?;
            let body = format!("{{{}}}", rendered.join(","));
            if level == 0 && all_mode {
                Ok(double_quote(&body))
            } else {
                Ok(body)
            }
        }
        Value::Scalar(s) if all_mode || level > 0 => Ok(double_quote(s)),
        Value::Scalar(s) => Ok(s.clone()),
        Value::Unsupported(shape) => Err(RenderError::UnsupportedType {
            path: trail.to_string(),
            shape: shape.as_str(),
        }),
    }
}
