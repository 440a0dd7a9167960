//! Metric definitions: the values of a metric scheme.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, SchemeResult};

/// A single metric definition: a SQL-fragment template, optionally
/// paired with a relation the query must join for the fragment to be
/// valid.
///
/// Templates may reference other metrics with `{name}` placeholders;
/// expansion happens in [`crate::resolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricDefinition {
    /// A raw template string.
    Simple(String),

    /// A template string plus the name of a relation that must be
    /// joined/eager-loaded before the expression is valid.
    Relational {
        expression: String,
        relation: Option<String>,
    },
}

impl MetricDefinition {
    /// The template text, regardless of variant.
    pub fn expression(&self) -> &str {
        match self {
            MetricDefinition::Simple(expr) => expr,
            MetricDefinition::Relational { expression, .. } => expression,
        }
    }

    /// The required relation name, if any.
    pub fn relation(&self) -> Option<&str> {
        match self {
            MetricDefinition::Simple(_) => None,
            MetricDefinition::Relational { relation, .. } => relation.as_deref(),
        }
    }

    /// Parse a definition from a loosely-typed configuration value.
    ///
    /// Accepted shapes mirror the declaration format schemes arrive in:
    /// a plain string, or a map with an `expression` key and an optional
    /// `with` key naming the required relation. Anything else fails with
    /// [`Error::InvalidMetricDefinition`].
    pub fn from_value(alias: &str, value: &Value) -> SchemeResult<Self> {
        let broken = || Error::InvalidMetricDefinition {
            alias: alias.to_string(),
        };
        match value {
            Value::String(expr) => Ok(MetricDefinition::Simple(expr.clone())),
            Value::Object(map) => {
                let expression = map
                    .get("expression")
                    .and_then(Value::as_str)
                    .ok_or_else(broken)?
                    .to_string();
                let relation = match map.get("with") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(name)) => Some(name.clone()),
                    Some(_) => return Err(broken()),
                };
                Ok(MetricDefinition::Relational {
                    expression,
                    relation,
                })
            }
            _ => Err(broken()),
        }
    }
}

impl From<&str> for MetricDefinition {
    fn from(expr: &str) -> Self {
        MetricDefinition::Simple(expr.to_string())
    }
}

impl From<String> for MetricDefinition {
    fn from(expr: String) -> Self {
        MetricDefinition::Simple(expr)
    }
}
