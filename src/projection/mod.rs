//! Projection building: select/group-by normalization over a metric
//! scheme.

mod group_by;
mod prepare;
mod request;
mod select;

pub use prepare::{prepare, prepare_with_default};
pub use request::{PreparedProjection, ProjectionRequest, Select, SelectEntry};
