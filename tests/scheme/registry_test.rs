//! Tests for the scheme registry cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use statql::error::Error;
use statql::scheme::{MetricScheme, SchemeRegistry};

fn counted_provider(
    calls: &Arc<AtomicUsize>,
) -> impl Fn() -> statql::SchemeResult<MetricScheme> + Send + Sync + 'static {
    let calls = Arc::clone(calls);
    move || {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(MetricScheme::from_metrics([("shows", "SUM(shows)")]))
    }
}

#[test]
fn test_provider_runs_once() {
    let registry = SchemeRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    registry.register("banner_stats", counted_provider(&calls));

    let first = registry.scheme_for("banner_stats").unwrap();
    let second = registry.scheme_for("banner_stats").unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_invalidate_forces_rebuild() {
    let registry = SchemeRegistry::new();
    let calls = Arc::new(AtomicUsize::new(0));
    registry.register("banner_stats", counted_provider(&calls));

    registry.scheme_for("banner_stats").unwrap();
    registry.invalidate("banner_stats");
    registry.scheme_for("banner_stats").unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_missing_provider() {
    let registry = SchemeRegistry::new();
    let err = registry.scheme_for("nope").unwrap_err();
    assert_eq!(err, Error::MissingScheme { entity: "nope".into() });
}

#[test]
fn test_reregister_drops_cached_scheme() {
    let registry = SchemeRegistry::new();
    registry.register_scheme("t", MetricScheme::from_metrics([("x", "1")]));
    assert!(registry.scheme_for("t").unwrap().contains("x"));

    registry.register_scheme("t", MetricScheme::from_metrics([("y", "2")]));
    let scheme = registry.scheme_for("t").unwrap();
    assert!(!scheme.contains("x"));
    assert!(scheme.contains("y"));
}

#[test]
fn test_provider_failure_not_cached() {
    let registry = SchemeRegistry::new();
    registry.register("t", || {
        Err(Error::InvalidMetricDefinition { alias: "x".into() })
    });
    assert!(registry.scheme_for("t").is_err());

    registry.register_scheme("t", MetricScheme::from_metrics([("x", "1")]));
    assert!(registry.scheme_for("t").is_ok());
}

#[test]
fn test_concurrent_first_lookup_builds_once() {
    let registry = Arc::new(SchemeRegistry::new());
    let calls = Arc::new(AtomicUsize::new(0));
    registry.register("banner_stats", counted_provider(&calls));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || registry.scheme_for("banner_stats").unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
