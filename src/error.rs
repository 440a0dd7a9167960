//! Error types for scheme resolution and projection building.
//!
//! All variants are configuration or programmer errors detected while
//! preparing a projection. None are transient: retrying a failed
//! `prepare` without fixing the scheme or the request cannot succeed,
//! and there is no partial-result mode — emitting incomplete SQL would
//! produce a wrong result, not a smaller one.

use thiserror::Error;

/// Result type for scheme and projection operations.
pub type SchemeResult<T> = Result<T, Error>;

/// Errors raised while resolving metric schemes and building projections.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The entity type has no registered metric scheme provider.
    #[error("no metric scheme registered for entity type '{entity}'")]
    MissingScheme { entity: String },

    /// The select value is not false/empty/string/collection.
    #[error("broken select value: {0}")]
    InvalidSelect(String),

    /// A scheme entry is neither a template string nor a well-formed
    /// relational definition.
    #[error("broken metric definition for '{alias}'")]
    InvalidMetricDefinition { alias: String },

    /// A template contains `}` without any well-formed `{name}` placeholder.
    #[error("can't interpret expression '{0}'")]
    MalformedExpression(String),

    /// A placeholder references a metric absent from the scheme.
    #[error("undefined metric '{{{name}}}' in expression: {expression}")]
    UndefinedMetric { name: String, expression: String },

    /// A metric template references itself, directly or through other
    /// metrics. The chain lists the names in expansion order.
    #[error("cyclic metric reference: {}", .0.join(" -> "))]
    CyclicMetric(Vec<String>),
}
