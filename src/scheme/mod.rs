//! Metric schemes: per-entity-type declarations of named SQL metrics.

mod metric;
mod registry;
#[allow(clippy::module_inception)]
mod scheme;

pub use metric::MetricDefinition;
pub use registry::SchemeRegistry;
pub use scheme::MetricScheme;
