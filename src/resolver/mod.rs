//! Metric expression resolution.
//!
//! Templates reference other metrics with `{name}` placeholders
//! (e.g. `"{clicks} / {shows}"`). Resolution rewrites the template
//! string, recursively expanding each placeholder against the scheme
//! until no placeholder remains. This is string rewriting, not an AST
//! transform: templates are simple nested named substitutions, not a
//! general expression language.
//!
//! Besides the substituted SQL, resolution reports which relations the
//! expanded metrics require, so the caller can register them for
//! joining/eager-loading.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, SchemeResult};
use crate::scheme::MetricScheme;

/// Pattern for `{name}` placeholders inside metric templates. Metric
/// names are declared as `[a-z _-]+`; matching is case-insensitive,
/// scheme lookup is not.
static PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z _-]+)\}").unwrap());

/// A fully resolved expression: the substituted SQL fragment plus the
/// relations required by every relational metric expanded along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub sql: String,
    pub relations: Vec<String>,
}

impl Resolved {
    fn literal(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
            relations: Vec::new(),
        }
    }
}

/// Resolve an expression template against a metric scheme.
///
/// Literal fragments (no `}` anywhere) pass through unchanged, so
/// resolution is idempotent on already-resolved expressions. A `}`
/// without any well-formed placeholder fails with
/// [`Error::MalformedExpression`]; an unknown placeholder fails with
/// [`Error::UndefinedMetric`]; a metric that expands back into itself
/// fails with [`Error::CyclicMetric`].
pub fn resolve(expression: &str, scheme: &MetricScheme) -> SchemeResult<Resolved> {
    let mut in_progress = Vec::new();
    resolve_inner(expression, scheme, &mut in_progress)
}

fn resolve_inner(
    expression: &str,
    scheme: &MetricScheme,
    in_progress: &mut Vec<String>,
) -> SchemeResult<Resolved> {
    if !expression.contains('}') {
        return Ok(Resolved::literal(expression));
    }

    let names: Vec<&str> = PLACEHOLDER_PATTERN
        .captures_iter(expression)
        .map(|caps| caps.get(1).unwrap().as_str())
        .collect();
    if names.is_empty() {
        return Err(Error::MalformedExpression(expression.to_string()));
    }

    let mut sql = expression.to_string();
    let mut relations = Vec::new();
    for name in names {
        let placeholder = format!("{{{name}}}");
        if !sql.contains(&placeholder) {
            // Already substituted via an earlier occurrence of the same name.
            continue;
        }
        let def = scheme.get(name).ok_or_else(|| Error::UndefinedMetric {
            name: name.to_string(),
            expression: expression.to_string(),
        })?;
        if in_progress.iter().any(|seen| seen == name) {
            let mut chain = in_progress.clone();
            chain.push(name.to_string());
            return Err(Error::CyclicMetric(chain));
        }

        in_progress.push(name.to_string());
        let expanded = resolve_inner(def.expression(), scheme, in_progress)?;
        in_progress.pop();

        if let Some(relation) = def.relation() {
            relations.push(relation.to_string());
        }
        relations.extend(expanded.relations);
        sql = sql.replace(&placeholder, &expanded.sql);
    }

    Ok(Resolved { sql, relations })
}
