//! The metric scheme: an ordered, immutable name → definition map.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Error, SchemeResult};
use crate::scheme::MetricDefinition;

/// The full metric mapping for one entity type.
///
/// Iteration order is declaration order; the `*` select expands metrics
/// in this order, so it is part of the contract, not an accident.
/// Schemes are immutable once built and are shared across requests via
/// `Arc` (see [`crate::scheme::SchemeRegistry`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricScheme {
    metrics: IndexMap<String, MetricDefinition>,
}

impl MetricScheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scheme from (name, definition) pairs, in order.
    pub fn from_metrics<I, N, D>(metrics: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<MetricDefinition>,
    {
        Self {
            metrics: metrics
                .into_iter()
                .map(|(name, def)| (name.into(), def.into()))
                .collect(),
        }
    }

    /// Parse a scheme from a loosely-typed configuration value: a map of
    /// metric name to either a template string or a relational
    /// definition map (see [`MetricDefinition::from_value`]).
    pub fn from_value(value: &Value) -> SchemeResult<Self> {
        let map = value.as_object().ok_or_else(|| Error::InvalidMetricDefinition {
            alias: value.to_string(),
        })?;
        let mut metrics = IndexMap::with_capacity(map.len());
        for (name, def) in map {
            metrics.insert(name.clone(), MetricDefinition::from_value(name, def)?);
        }
        Ok(Self { metrics })
    }

    /// Add a definition, replacing any existing one under the same name.
    pub fn insert(&mut self, name: impl Into<String>, def: impl Into<MetricDefinition>) {
        self.metrics.insert(name.into(), def.into());
    }

    /// Look up a metric definition by name. Lookup is exact: metric
    /// names are case-sensitive even though placeholder matching is not.
    pub fn get(&self, name: &str) -> Option<&MetricDefinition> {
        self.metrics.get(name)
    }

    /// Whether `name` is a declared metric.
    pub fn contains(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    /// Metric names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricDefinition)> {
        self.metrics.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
