//! Process-lifetime metric scheme cache.
//!
//! Entity types declare their scheme through a provider registered here;
//! the registry builds each scheme at most once and hands out shared
//! `Arc`s afterwards. The cache is explicit and explicitly invalidated —
//! there is no implicit per-type static state.
//!
//! # Design
//!
//! - Providers run lazily, on the first `scheme_for` call per entity type
//! - Built schemes are immutable; readers share them without locking
//! - `invalidate` / `invalidate_all` are the only reload surface
//! - A provider failure is not cached; the next lookup retries it

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::debug;

use crate::error::{Error, SchemeResult};
use crate::scheme::MetricScheme;

type SchemeProvider = Box<dyn Fn() -> SchemeResult<MetricScheme> + Send + Sync>;

/// Registry of metric scheme providers, keyed by entity-type name.
#[derive(Default)]
pub struct SchemeRegistry {
    providers: RwLock<HashMap<String, SchemeProvider>>,
    cache: RwLock<HashMap<String, Arc<MetricScheme>>>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scheme provider for an entity type, replacing any
    /// previous provider and dropping the cached scheme so the next
    /// lookup rebuilds it.
    pub fn register<F>(&self, entity: impl Into<String>, provider: F)
    where
        F: Fn() -> SchemeResult<MetricScheme> + Send + Sync + 'static,
    {
        let entity = entity.into();
        self.cache.write().unwrap().remove(&entity);
        self.providers
            .write()
            .unwrap()
            .insert(entity, Box::new(provider));
    }

    /// Register a fixed scheme for an entity type.
    pub fn register_scheme(&self, entity: impl Into<String>, scheme: MetricScheme) {
        self.register(entity, move || Ok(scheme.clone()));
    }

    /// The scheme for an entity type, building and caching it on first
    /// use. Fails with [`Error::MissingScheme`] when no provider is
    /// registered.
    pub fn scheme_for(&self, entity: &str) -> SchemeResult<Arc<MetricScheme>> {
        if let Some(scheme) = self.cache.read().unwrap().get(entity) {
            return Ok(Arc::clone(scheme));
        }

        // Build under the write lock so the provider runs at most once
        // per entity type even under concurrent first lookups.
        let mut cache = self.cache.write().unwrap();
        if let Some(scheme) = cache.get(entity) {
            return Ok(Arc::clone(scheme));
        }

        let providers = self.providers.read().unwrap();
        let provider = providers.get(entity).ok_or_else(|| Error::MissingScheme {
            entity: entity.to_string(),
        })?;
        let scheme = Arc::new(provider()?);
        debug!(
            "built metric scheme for '{}' ({} metrics)",
            entity,
            scheme.len()
        );
        cache.insert(entity.to_string(), Arc::clone(&scheme));
        Ok(scheme)
    }

    /// Drop the cached scheme for one entity type. The provider stays
    /// registered; the next lookup rebuilds.
    pub fn invalidate(&self, entity: &str) {
        if self.cache.write().unwrap().remove(entity).is_some() {
            debug!("invalidated metric scheme for '{}'", entity);
        }
    }

    /// Drop every cached scheme.
    pub fn invalidate_all(&self) {
        self.cache.write().unwrap().clear();
        debug!("invalidated all metric schemes");
    }
}
