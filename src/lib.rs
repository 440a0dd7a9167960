//! # statql
//!
//! A metric-scheme projection compiler: resolves a requested select and
//! group-by list against a declarative metric scheme into concrete,
//! dependency-resolved SQL expressions, tracking which relations the
//! query must join to satisfy the referenced metrics.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │         Metric scheme (per entity type, cached)          │
//! │   name → template, e.g. ctr → "{clicks} / {shows}"       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [resolver]
//! ┌─────────────────────────────────────────────────────────┐
//! │     Recursive {name} substitution + required relations   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [projection]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Select/group-by normalization → PreparedProjection     │
//! │   (alias → SQL map, group-by list, relation set)         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The output is handed to an external SQL builder, which performs
//! identifier quoting and join construction; statql never executes SQL
//! or touches a database.
//!
//! ## Example
//!
//! ```
//! use statql::prelude::*;
//!
//! let registry = SchemeRegistry::new();
//! registry.register_scheme(
//!     "banner_stats",
//!     MetricScheme::from_metrics([
//!         ("shows", "SUM(shows)"),
//!         ("clicks", "SUM(clicks)"),
//!         ("ctr", "{clicks} / {shows}"),
//!     ]),
//! );
//!
//! let request = ProjectionRequest::new("banner_stats")
//!     .select(Select::from_str_value("ctr"))
//!     .group_by(["banner_id"]);
//! let prepared = prepare(request, &registry).unwrap();
//!
//! let select = prepared.select.unwrap();
//! assert_eq!(select["ctr"], "SUM(clicks) / SUM(shows)");
//! assert_eq!(select.get_index(0).unwrap().0, "banner_id");
//! ```

pub mod error;
pub mod projection;
pub mod resolver;
pub mod scheme;

pub use error::{Error, SchemeResult};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::error::{Error, SchemeResult};
    pub use crate::projection::{
        prepare, prepare_with_default, PreparedProjection, ProjectionRequest, Select, SelectEntry,
    };
    pub use crate::resolver::{resolve, Resolved};
    pub use crate::scheme::{MetricDefinition, MetricScheme, SchemeRegistry};
}
