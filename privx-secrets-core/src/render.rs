//! Choosing between display, flatten-and-assign, and spread.

use crate::error::{RenderError, Result};
use crate::flatten::flatten_within;
use crate::path::PathExpression;
use crate::shell::Dialect;
use crate::spread::spread_within;
use crate::value::Value;

/// Everything needed to render one key expression against a secret's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    expression: PathExpression,
    spread: bool,
    dialect: Dialect,
}

impl RenderRequest {
    /// Builds a request, rejecting spread in display mode.
    ///
    /// Spreading names every leaf after the expression's variable name, so a
    /// display-mode expression has nothing to name them by. Callers should
    /// build the request before fetching anything.
    pub fn new(expression: PathExpression, spread: bool, dialect: Dialect) -> Result<Self> {
        if spread && !expression.is_assignment() {
            return Err(RenderError::Configuration(format!(
                "cannot spread '{}' without a variable name (use NAME={})",
                expression.raw(),
                expression.raw()
            )));
        }
        Ok(Self {
            expression,
            spread,
            dialect,
        })
    }

    pub fn expression(&self) -> &PathExpression {
        &self.expression
    }

    pub fn spread(&self) -> bool {
        self.spread
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Renders the request against `data`, the secret's `data` member.
    ///
    /// Returns the output lines, each ending in a newline.
    pub fn render(&self, data: &Value) -> Result<Vec<String>> {
        let target = self.expression.resolve(data)?;
        let trail = self.expression.trail();

        match self.expression.env_name() {
            None => Ok(vec![format!("{}\n", flatten_within(target, false, 0, &trail)?)]),
            Some(env) if self.spread => Ok(spread_within(&[env.to_owned()], target, &trail)?
                .into_iter()
                .map(|leaf| self.dialect.assignment(&leaf.name, &leaf.value))
                .collect()),
            Some(env) => {
                let value = flatten_within(target, true, 0, &trail)?;
                Ok(vec![self.dialect.assignment(env, &value)])
            }
        }
    }
}
