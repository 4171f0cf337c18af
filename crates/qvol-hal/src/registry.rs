//! Sampler registry for configuration-driven construction.
//!
//! The [`SamplerRegistry`] maps a sampler kind (the `kind` field of a
//! [`SamplerConfig`]) to a factory, so an experiment file can name its
//! samplers without the caller wiring concrete types.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{HalError, HalResult};
use crate::sampler::{Sampler, SamplerConfig, SamplerFactory};

/// Factory function type for registered samplers.
type SamplerCtor = Box<dyn Fn(SamplerConfig) -> HalResult<Box<dyn Sampler>> + Send + Sync>;

/// Central registry for sampler kinds.
pub struct SamplerRegistry {
    factories: FxHashMap<String, SamplerCtor>,
}

impl SamplerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
        }
    }

    /// Register a sampler type that knows how to build itself from config.
    pub fn register<S>(&mut self, kind: impl Into<String>)
    where
        S: SamplerFactory + 'static,
    {
        let kind = kind.into();
        debug!(kind = %kind, "registering sampler");
        self.factories.insert(
            kind,
            Box::new(|config| {
                let sampler = S::from_config(config)?;
                Ok(Box::new(sampler))
            }),
        );
    }

    /// Register a sampler factory with a custom constructor.
    pub fn register_factory(
        &mut self,
        kind: impl Into<String>,
        factory: impl Fn(SamplerConfig) -> HalResult<Box<dyn Sampler>> + Send + Sync + 'static,
    ) {
        let kind = kind.into();
        debug!(kind = %kind, "registering sampler factory");
        self.factories.insert(kind, Box::new(factory));
    }

    /// Build a sampler from its configuration.
    pub fn create(&self, config: &SamplerConfig) -> HalResult<Box<dyn Sampler>> {
        match self.factories.get(&config.kind) {
            Some(factory) => {
                debug!(name = %config.name, kind = %config.kind, "creating sampler");
                factory(config.clone())
            }
            None => Err(HalError::UnknownSampler(format!(
                "no sampler registered for kind '{}' (known: {})",
                config.kind,
                self.kinds().join(", ")
            ))),
        }
    }

    /// Build every sampler in `configs`, in order.
    pub fn create_all(&self, configs: &[SamplerConfig]) -> HalResult<Vec<Box<dyn Sampler>>> {
        configs.iter().map(|c| self.create(c)).collect()
    }

    /// List all registered kinds, sorted.
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<_> = self.factories.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// Check whether a kind is registered.
    pub fn has_kind(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }
}

impl Default for SamplerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry() {
        let registry = SamplerRegistry::new();
        assert!(registry.kinds().is_empty());
        assert!(!registry.has_kind("ideal"));
    }

    #[test]
    fn test_register_factory() {
        let mut registry = SamplerRegistry::new();
        registry.register_factory("test", |_config| {
            Err(HalError::Configuration("test only".into()))
        });

        assert!(registry.has_kind("test"));
        assert_eq!(registry.kinds(), vec!["test"]);

        let result = registry.create(&SamplerConfig::new("t", "test"));
        assert!(matches!(result, Err(HalError::Configuration(_))));
    }

    #[test]
    fn test_create_unknown_kind() {
        let registry = SamplerRegistry::new();
        let result = registry.create(&SamplerConfig::new("x", "nonexistent"));
        assert!(matches!(result, Err(HalError::UnknownSampler(_))));
    }

    #[test]
    fn test_kinds_sorted() {
        let mut registry = SamplerRegistry::new();
        registry.register_factory("zebra", |_| Err(HalError::Configuration("test".into())));
        registry.register_factory("alpha", |_| Err(HalError::Configuration("test".into())));

        assert_eq!(registry.kinds(), vec!["alpha", "zebra"]);
    }
}
