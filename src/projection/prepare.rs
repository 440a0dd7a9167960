//! The prepare pass: the one entry point a query object calls right
//! before SQL generation.
//!
//! Sequencing is a hard invariant: select normalization runs strictly
//! before group-by normalization, because group-by synthesis tests
//! membership against the already-normalized select map.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::error::SchemeResult;
use crate::projection::request::{PreparedProjection, ProjectionRequest, Select};
use crate::scheme::{MetricScheme, SchemeRegistry};

/// Working state threaded through the normalization passes. One per
/// prepare call; shared by every query-object variant instead of each
/// variant carrying its own copy of the algorithm.
pub(crate) struct Preparer {
    pub(crate) scheme: Arc<MetricScheme>,
    pub(crate) select: Option<IndexMap<String, String>>,
    pub(crate) group_by: Vec<String>,
    pub(crate) with: IndexSet<String>,
}

/// Prepare a projection request with the standard `*` default select.
pub fn prepare(
    request: ProjectionRequest,
    registry: &SchemeRegistry,
) -> SchemeResult<PreparedProjection> {
    prepare_with_default(request, registry, Select::Default)
}

/// Prepare a projection request, using `default_select` when the
/// request carries no explicit select.
///
/// The result is handed to the external SQL builder: an alias → SQL
/// map (or no projection at all), the normalized group-by list, and the
/// relation names the query must join or eager-load.
pub fn prepare_with_default(
    mut request: ProjectionRequest,
    registry: &SchemeRegistry,
    default_select: Select,
) -> SchemeResult<PreparedProjection> {
    let scheme = request.scheme(registry)?;
    let mut preparer = Preparer {
        scheme,
        select: None,
        group_by: std::mem::take(&mut request.group_by),
        with: std::mem::take(&mut request.with),
    };

    preparer.normalize_select(std::mem::take(&mut request.select), default_select)?;
    preparer.normalize_group_by()?;

    Ok(PreparedProjection {
        select: preparer.select,
        group_by: preparer.group_by,
        with: preparer.with,
        distinct: false,
    })
}
