//! Projection request and result types - the user-facing query surface.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::error::{Error, SchemeResult};
use crate::scheme::{MetricScheme, SchemeRegistry};

/// One explicit select entry: an expression with an optional output
/// alias. Entries without an alias get one during normalization (bare
/// identifiers alias to themselves).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectEntry {
    pub alias: Option<String>,
    pub expression: String,
}

impl SelectEntry {
    pub fn bare(expression: impl Into<String>) -> Self {
        Self {
            alias: None,
            expression: expression.into(),
        }
    }

    pub fn aliased(alias: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            expression: expression.into(),
        }
    }
}

/// The requested select list, decided at the API boundary.
///
/// Callers that accept loosely-typed select values (the historical
/// false | "" | "a,b" | list | map shapes) convert them here once via
/// [`Select::from_value`]; the pipeline itself only ever sees these
/// three variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Select {
    /// Explicit "no column projection" sentinel, e.g. for existence
    /// checks. The pipeline leaves the request without a select map.
    None,

    /// Expand to every metric in the scheme, in scheme order.
    #[default]
    Default,

    /// Explicit field list. An empty list is treated as [`Select::Default`].
    Fields(Vec<SelectEntry>),
}

impl Select {
    /// Parse a loosely-typed select value.
    ///
    /// - `false` → [`Select::None`]
    /// - `null`, `""`, `"*"` → [`Select::Default`]
    /// - other string → comma-split into trimmed bare entries
    /// - array of strings → bare entries
    /// - map of alias → expression → aliased entries, in map order
    ///
    /// Anything else fails with [`Error::InvalidSelect`].
    pub fn from_value(value: &Value) -> SchemeResult<Self> {
        match value {
            Value::Bool(false) => Ok(Select::None),
            Value::Null => Ok(Select::Default),
            Value::String(s) => Ok(Select::from_str_value(s)),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(expr) => Ok(SelectEntry::bare(expr.clone())),
                    other => Err(Error::InvalidSelect(other.to_string())),
                })
                .collect::<SchemeResult<Vec<_>>>()
                .map(Select::Fields),
            Value::Object(map) => Ok(Select::Fields(
                map.iter()
                    .map(|(alias, expr)| match expr {
                        Value::String(expr) => Ok(SelectEntry::aliased(alias.clone(), expr.clone())),
                        other => Err(Error::InvalidSelect(other.to_string())),
                    })
                    .collect::<SchemeResult<Vec<_>>>()?,
            )),
            other => Err(Error::InvalidSelect(other.to_string())),
        }
    }

    /// Parse a select string: empty and `"*"` mean "all metrics",
    /// anything else is a comma-delimited field list.
    pub fn from_str_value(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "*" {
            return Select::Default;
        }
        Select::Fields(
            trimmed
                .split(',')
                .map(|field| SelectEntry::bare(field.trim()))
                .collect(),
        )
    }

    /// Whether this select carries no explicit fields (and so falls back
    /// to the default).
    pub fn is_empty(&self) -> bool {
        match self {
            Select::Default => true,
            Select::Fields(entries) => entries.is_empty(),
            Select::None => false,
        }
    }
}

/// The working state of one query build.
///
/// Created fresh per logical query, populated by the caller, passed once
/// through [`crate::projection::prepare`] and discarded after SQL
/// generation. The only state shared across requests is the metric
/// scheme, fetched from the registry on first use and cached here for
/// the rest of the pass.
#[derive(Debug, Clone, Default)]
pub struct ProjectionRequest {
    pub entity: String,
    pub select: Select,
    pub group_by: Vec<String>,
    pub with: IndexSet<String>,
    scheme: Option<Arc<MetricScheme>>,
}

impl ProjectionRequest {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Default::default()
        }
    }

    pub fn select(mut self, select: Select) -> Self {
        self.select = select;
        self
    }

    pub fn group_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Request a relation up front, independent of any metric.
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.with.insert(relation.into());
        self
    }

    /// The metric scheme for this request's entity type. Fetched from
    /// the registry once and cached on the request.
    pub fn scheme(&mut self, registry: &SchemeRegistry) -> SchemeResult<Arc<MetricScheme>> {
        if let Some(scheme) = &self.scheme {
            return Ok(Arc::clone(scheme));
        }
        let scheme = registry.scheme_for(&self.entity)?;
        self.scheme = Some(Arc::clone(&scheme));
        Ok(scheme)
    }
}

/// The output of a prepare pass, handed to the external SQL builder.
///
/// The builder quotes raw identifiers itself; resolved metric
/// expressions are trusted SQL fragments and pass through verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedProjection {
    /// Alias → SQL fragment, in projection order. `None` means the
    /// request opted out of a select clause ([`Select::None`]).
    pub select: Option<IndexMap<String, String>>,
    pub group_by: Vec<String>,
    pub with: IndexSet<String>,
    pub distinct: bool,
}

impl PreparedProjection {
    /// The projection for counting grouped rows: the grouped expressions
    /// become the (distinct) select list of a subquery the caller wraps
    /// in `SELECT COUNT(*) FROM (...)`.
    pub fn count_projection(&self) -> PreparedProjection {
        PreparedProjection {
            select: Some(
                self.group_by
                    .iter()
                    .map(|expr| (expr.clone(), expr.clone()))
                    .collect(),
            ),
            group_by: Vec::new(),
            with: self.with.clone(),
            distinct: true,
        }
    }
}
