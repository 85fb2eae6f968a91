//! Backend registry
//!
//! Maps a backend name to its [`NormalizationUnit`]. Populated once at
//! process start, read many times afterwards.

use crate::unit::{BackendKind, NormalizationUnit};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Central registry of normalization units, keyed by backend name.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    units: HashMap<String, Arc<dyn NormalizationUnit>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit under its own name, replacing any previous one.
    pub fn register<U>(&mut self, unit: U)
    where
        U: NormalizationUnit + 'static,
    {
        self.register_shared(Arc::new(unit));
    }

    pub fn register_shared(&mut self, unit: Arc<dyn NormalizationUnit>) {
        let name = unit.name().to_string();
        if self.units.insert(name.clone(), unit).is_some() {
            tracing::debug!(backend = %name, "Replaced registered backend");
        }
    }

    /// Look up a unit by name.
    ///
    /// An unknown name is a configuration error, never a silent skip.
    pub fn lookup(&self, name: &str) -> Result<&dyn NormalizationUnit> {
        self.units
            .get(name)
            .map(|unit| unit.as_ref())
            .ok_or_else(|| Error::UnknownBackend {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// All registered names (sorted).
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.units.keys().map(String::as_str).collect();
        names.sort();
        names
    }

    /// Names of units supporting the given role (sorted).
    pub fn by_kind(&self, kind: BackendKind) -> Vec<&str> {
        let mut names: Vec<_> = self
            .units
            .iter()
            .filter(|(_, unit)| unit.supports(kind))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("units", &self.list())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy {
        name: &'static str,
        kinds: &'static [BackendKind],
    }

    impl NormalizationUnit for Dummy {
        fn name(&self) -> &str {
            self.name
        }

        fn kinds(&self) -> &[BackendKind] {
            self.kinds
        }
    }

    fn dummy(name: &'static str, kinds: &'static [BackendKind]) -> Dummy {
        Dummy { name, kinds }
    }

    #[test]
    fn test_empty_registry() {
        let registry = BackendRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = BackendRegistry::new();
        registry.register(dummy("minio", &[BackendKind::Storage]));

        assert!(registry.contains("minio"));
        assert_eq!(registry.lookup("minio").unwrap().name(), "minio");
    }

    #[test]
    fn test_lookup_unknown_is_an_error() {
        let registry = BackendRegistry::new();
        let err = registry.lookup("nope").err().unwrap();
        assert!(matches!(err, Error::UnknownBackend { ref name } if name == "nope"));
    }

    #[test]
    fn test_list_and_by_kind_are_sorted() {
        let mut registry = BackendRegistry::new();
        registry.register(dummy("redis", &[BackendKind::Storage]));
        registry.register(dummy("aws_lambda", &[BackendKind::Compute]));
        registry.register(dummy(
            "localhost",
            &[BackendKind::Storage, BackendKind::Compute],
        ));

        assert_eq!(registry.list(), vec!["aws_lambda", "localhost", "redis"]);
        assert_eq!(
            registry.by_kind(BackendKind::Storage),
            vec!["localhost", "redis"]
        );
        assert!(registry.by_kind(BackendKind::Standalone).is_empty());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = BackendRegistry::new();
        registry.register(dummy("vm", &[BackendKind::Standalone]));
        registry.register(dummy("vm", &[BackendKind::Compute]));

        assert_eq!(registry.len(), 1);
        assert!(registry.lookup("vm").unwrap().supports(BackendKind::Compute));
    }
}
