//! End-to-end tests for the prepare pass.

use statql::error::Error;
use statql::projection::{prepare, prepare_with_default, ProjectionRequest, Select};
use statql::scheme::{MetricDefinition, MetricScheme, SchemeRegistry};

fn registry() -> SchemeRegistry {
    let registry = SchemeRegistry::new();
    let mut scheme = MetricScheme::from_metrics([
        ("shows", "SUM(shows)"),
        ("clicks", "SUM(clicks)"),
        ("ctr", "{clicks} / {shows}"),
    ]);
    scheme.insert(
        "conversions",
        MetricDefinition::Relational {
            expression: "COUNT(conversion.id)".into(),
            relation: Some("conversion".into()),
        },
    );
    registry.register_scheme("banner_stats", scheme);
    registry
}

#[test]
fn test_full_pass() {
    let request = ProjectionRequest::new("banner_stats")
        .select(Select::from_str_value("ctr, conversions"))
        .group_by(["banner_id"]);
    let prepared = prepare(request, &registry()).unwrap();

    let select = prepared.select.unwrap();
    let entries: Vec<_> = select
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        entries,
        [
            ("banner_id", "banner_id"),
            ("ctr", "SUM(clicks) / SUM(shows)"),
            ("conversions", "COUNT(conversion.id)"),
        ]
    );
    assert_eq!(prepared.group_by, ["banner_id"]);
    let relations: Vec<_> = prepared.with.iter().cloned().collect();
    assert_eq!(relations, ["conversion"]);
    assert!(!prepared.distinct);
}

#[test]
fn test_unknown_entity_type() {
    let request = ProjectionRequest::new("unknown");
    let err = prepare(request, &registry()).unwrap_err();
    assert_eq!(
        err,
        Error::MissingScheme {
            entity: "unknown".into()
        }
    );
}

#[test]
fn test_custom_default_select() {
    let request = ProjectionRequest::new("banner_stats");
    let prepared =
        prepare_with_default(request, &registry(), Select::from_str_value("shows")).unwrap();

    let select = prepared.select.unwrap();
    assert_eq!(select.len(), 1);
    assert_eq!(select["shows"], "SUM(shows)");
}

#[test]
fn test_explicit_select_overrides_default() {
    let request = ProjectionRequest::new("banner_stats").select(Select::from_str_value("clicks"));
    let prepared =
        prepare_with_default(request, &registry(), Select::from_str_value("shows")).unwrap();
    assert_eq!(prepared.select.unwrap().len(), 1);
}

#[test]
fn test_count_projection_wraps_group_keys() {
    let request = ProjectionRequest::new("banner_stats")
        .select(Select::from_str_value("ctr"))
        .group_by(["banner_id", "campaign_id"]);
    let prepared = prepare(request, &registry()).unwrap();

    let count = prepared.count_projection();
    assert!(count.distinct);
    assert!(count.group_by.is_empty());
    let select = count.select.unwrap();
    let keys: Vec<_> = select.keys().map(String::as_str).collect();
    assert_eq!(keys, ["banner_id", "campaign_id"]);
    assert_eq!(count.with, prepared.with);
}
