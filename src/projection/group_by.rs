//! Group-by normalization.
//!
//! Runs after select normalization. Metric names in the group-by list
//! are swapped for their resolved SQL; any other grouped field missing
//! from the projection is synthesized into it, because grouping by a
//! column requires that column to be selectable.

use crate::error::SchemeResult;
use crate::projection::prepare::Preparer;

impl Preparer {
    /// Normalize the group-by list against the already-normalized select
    /// map.
    ///
    /// Synthesized select entries are prepended, so they take projection
    /// position before user-specified fields; entries synthesized later
    /// land before earlier ones. Requests without a select map
    /// ([`crate::projection::Select::None`]) get no synthesis.
    pub(crate) fn normalize_group_by(&mut self) -> SchemeResult<()> {
        if self.group_by.is_empty() {
            return Ok(());
        }

        let mut group_by = std::mem::take(&mut self.group_by);
        for field in &mut group_by {
            if let Some(def) = self.scheme.get(field).cloned() {
                *field = self.substitute_metric(&def)?;
            } else if let Some(select) = &mut self.select {
                let present = select.contains_key(field.as_str())
                    || select.values().any(|expr| expr == field);
                if !present {
                    select.shift_insert(0, field.clone(), field.clone());
                }
            }
        }
        self.group_by = group_by;
        Ok(())
    }
}
