//! Decomposing a value into individually named leaves.

use crate::error::{RenderError, Result};
use crate::path::Trail;
use crate::value::Value;

/// Joins the segments of a spread leaf's name.
pub const NAME_JOINER: &str = "_";

/// One spread leaf: a variable name and its double-quoted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub name: String,
    pub value: String,
}

/// Spreads `value` under `prefix`.
///
/// Every scalar reachable from `value` becomes one [`Leaf`] named by the
/// prefix plus the member names leading to it, joined with [`NAME_JOINER`].
/// Leaves of sibling members come out in the value's member order, which
/// carries no meaning.
///
/// # Errors
///
/// - [`RenderError::InvalidSpread`] if a scalar is reached with an empty
///   prefix (a bare scalar has no name to assign to).
/// - [`RenderError::UnsupportedType`] for any non-string, non-object node.
///
/// # Example
///
/// ```
/// use privx_secrets_core::{Value, spread};
///
/// let db: Value = [("host", "h")].into_iter().collect();
/// let leaves = spread(&["cred".to_string()], &db).unwrap();
/// assert_eq!(leaves[0].name, "cred_host");
/// assert_eq!(leaves[0].value, "\"h\"");
/// ```
pub fn spread(prefix: &[String], value: &Value) -> Result<Vec<Leaf>> {
    spread_within(prefix, value, &Trail::default())
}

/// Like [`spread`], reporting errors relative to `trail`.
pub fn spread_within(prefix: &[String], value: &Value, trail: &Trail) -> Result<Vec<Leaf>> {
    match value {
        Value::Compound(members) => {
            let mut leaves = Vec::new();
            for (key, child) in members {
                let mut child_prefix = prefix.to_vec();
                child_prefix.push(key.clone());
                leaves.extend(spread_within(&child_prefix, child, &trail.child(key))?);
            }
            Ok(leaves)
        }
        Value::Scalar(_) if prefix.is_empty() => Err(RenderError::InvalidSpread {
            path: trail.to_string(),
        }),
        Value::Scalar(s) => Ok(vec![Leaf {
            name: prefix.join(NAME_JOINER),
            value: double_quote(s),
        }]),
        Value::Unsupported(shape) => Err(RenderError::UnsupportedType {
            path: trail.to_string(),
            shape: shape.as_str(),
        }),
    }
}

/// Wraps `s` in a pair of double quotes. The contents are not escaped.
pub(crate) fn double_quote(s: &str) -> String {
    format!("\"{}\"", s)
}
