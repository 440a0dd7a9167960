//! Select-list normalization.
//!
//! Turns the requested [`Select`] into a uniform alias → expression map:
//! applies the default, re-keys bare identifiers, and swaps metric names
//! for their resolved SQL, registering any relations the metrics need.

use indexmap::IndexMap;

use crate::error::SchemeResult;
use crate::projection::prepare::Preparer;
use crate::projection::request::{Select, SelectEntry};
use crate::resolver;
use crate::scheme::MetricDefinition;

/// A field is a bare identifier when it carries no aliasing, function
/// call, or table qualification. Bare identifiers are re-keyed so the
/// output alias equals the field name; everything else is passed to the
/// SQL builder under its given alias.
fn is_bare_identifier(expression: &str) -> bool {
    !expression.contains("AS") && !expression.contains(')') && !expression.contains('.')
}

impl Preparer {
    /// Normalize the select list into the alias-keyed projection map.
    ///
    /// [`Select::None`] leaves the request without a projection (the
    /// caller wants no select clause at all). An empty select falls back
    /// to `default`, and the default-default expands every scheme metric
    /// in scheme order, each aliased to itself.
    pub(crate) fn normalize_select(&mut self, select: Select, default: Select) -> SchemeResult<()> {
        let select = if select.is_empty() { default } else { select };
        let entries = match select {
            Select::None => {
                self.select = None;
                return Ok(());
            }
            Select::Default => self
                .scheme
                .names()
                .map(SelectEntry::bare)
                .collect::<Vec<_>>(),
            Select::Fields(entries) => entries,
        };

        let mut map = IndexMap::with_capacity(entries.len());
        for entry in entries {
            let expression = entry.expression.trim().to_string();
            if is_bare_identifier(&expression) {
                map.insert(expression.clone(), expression);
            } else {
                let alias = entry.alias.unwrap_or_else(|| expression.clone());
                map.insert(alias, expression);
            }
        }

        // Swap every value that names a metric for its resolved SQL.
        for idx in 0..map.len() {
            let expression = map.get_index(idx).map(|(_, v)| v.clone()).unwrap();
            if let Some(def) = self.scheme.get(&expression).cloned() {
                let sql = self.substitute_metric(&def)?;
                if let Some((_, value)) = map.get_index_mut(idx) {
                    *value = sql;
                }
            }
        }

        self.select = Some(map);
        Ok(())
    }

    /// Resolve a metric definition to SQL, registering the relations it
    /// requires. A relation is registered iff it is not already present
    /// among the requested relations.
    pub(crate) fn substitute_metric(&mut self, def: &MetricDefinition) -> SchemeResult<String> {
        let resolved = resolver::resolve(def.expression(), &self.scheme)?;
        if let Some(relation) = def.relation() {
            self.with.insert(relation.to_string());
        }
        for relation in resolved.relations {
            self.with.insert(relation);
        }
        Ok(resolved.sql)
    }
}
