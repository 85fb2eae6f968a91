//! Resolution pipeline
//!
//! The `Resolver` drives every selected backend through the same ordered
//! steps:
//!
//! 1. **Presence** - the backend section (and a mandatory provider section)
//!    must exist
//! 2. **Provider merge** - provider keys fill gaps, never overwrite
//! 3. **Required keys** - first missing key fails the run
//! 4. **Defaults** - injected only where absent
//! 5. **Workers** - the generic `workers` count lands in the backend's
//!    worker field
//! 6. **Validation** - semantic checks on the now complete section
//! 7. **Derivation** - computed fields
//! 8. **Propagation** - derived values and the backend's name copied up
//!    into the generic section
//!
//! Resolution works on its own copy of the document and stops at the first
//! failing backend.

use crate::derive::{fill, is_absent};
use crate::document::{ConfigDocument, ResolvedDocument, Section};
use crate::generic::{self, BackendSelection, GENERIC_SECTION, WORKERS_KEY};
use crate::registry::BackendRegistry;
use crate::unit::{BackendKind, DeriveContext, NormalizationUnit};
use crate::{Error, Result};
use std::num::NonZeroUsize;

/// A unit to resolve and the roles it was selected for.
type Selected<'a> = (&'a dyn NormalizationUnit, Vec<BackendKind>);

/// Resolves configuration documents against a [`BackendRegistry`].
#[derive(Debug, Clone)]
pub struct Resolver<'r> {
    registry: &'r BackendRegistry,
    parallelism: usize,
}

impl<'r> Resolver<'r> {
    /// Create a resolver using the machine's available parallelism as the
    /// worker count when the generic section sets none.
    pub fn new(registry: &'r BackendRegistry) -> Self {
        Self {
            registry,
            parallelism: local_parallelism(),
        }
    }

    /// Override the worker count used when the generic section sets none.
    pub fn with_parallelism(mut self, parallelism: NonZeroUsize) -> Self {
        self.parallelism = parallelism.get();
        self
    }

    pub fn registry(&self) -> &BackendRegistry {
        self.registry
    }

    /// Resolve `document` for the named backends, in the given order.
    ///
    /// A name listed twice is resolved once. Unknown names fail before any
    /// backend is touched.
    pub fn resolve(&self, document: ConfigDocument, selected: &[&str]) -> Result<ResolvedDocument> {
        let mut units: Vec<Selected<'_>> = Vec::with_capacity(selected.len());
        for name in selected {
            let unit = self.registry.lookup(name)?;
            if !units.iter().any(|(u, _)| u.name() == unit.name()) {
                units.push((unit, unit.kinds().to_vec()));
            }
        }
        self.resolve_units(document, &units)
    }

    /// Resolve `document` for a [`BackendSelection`], checking that every
    /// backend supports the role it was selected for.
    pub fn resolve_selection(
        &self,
        document: ConfigDocument,
        selection: &BackendSelection,
    ) -> Result<ResolvedDocument> {
        let mut units: Vec<Selected<'_>> = Vec::new();
        for (name, kind) in selection.ordered() {
            let unit = self.registry.lookup(name)?;
            if !unit.supports(kind) {
                return Err(Error::invalid(
                    GENERIC_SECTION,
                    generic::role_key(kind),
                    format!("'{name}' is not a {kind} backend"),
                ));
            }
            match units.iter_mut().find(|(u, _)| u.name() == unit.name()) {
                Some((_, roles)) => roles.push(kind),
                None => units.push((unit, vec![kind])),
            }
        }
        self.resolve_units(document, &units)
    }

    /// Resolve `document` for the backends its generic section selects.
    pub fn resolve_configured(&self, document: ConfigDocument) -> Result<ResolvedDocument> {
        let selection = BackendSelection::from_generic(&document)?;
        self.resolve_selection(document, &selection)
    }

    fn resolve_units(
        &self,
        mut document: ConfigDocument,
        units: &[Selected<'_>],
    ) -> Result<ResolvedDocument> {
        let globals = document.section_or_default(GENERIC_SECTION);
        generic::normalize_generic(globals, self.parallelism)?;

        for (unit, roles) in units {
            self.resolve_backend(&mut document, *unit, roles)?;
        }

        tracing::info!(
            backends = ?units.iter().map(|(u, _)| u.name()).collect::<Vec<_>>(),
            "Configuration resolved"
        );
        Ok(ResolvedDocument::new(document))
    }

    fn resolve_backend(
        &self,
        document: &mut ConfigDocument,
        unit: &dyn NormalizationUnit,
        roles: &[BackendKind],
    ) -> Result<()> {
        let name = unit.name();
        let _span = tracing::debug_span!("resolve_backend", backend = name).entered();

        // Presence
        if !document.contains_section(name) {
            if unit.section_mandatory() {
                return Err(Error::MissingSection {
                    section: name.to_string(),
                });
            }
            tracing::debug!("Section absent, starting from an empty one");
        }
        let provider = match unit.provider() {
            Some(link) => match document.section(link.section) {
                Some(section) => Some(section.clone()),
                None if link.mandatory => {
                    return Err(Error::MissingSection {
                        section: link.section.to_string(),
                    });
                }
                None => None,
            },
            None => None,
        };

        let generic = document
            .section(GENERIC_SECTION)
            .cloned()
            .unwrap_or_default();
        let mut section = document.section(name).cloned().unwrap_or_default();

        // Provider merge
        if let Some(provider) = provider {
            let inherited = merge_missing(&mut section, &provider);
            tracing::debug!(inherited, "Merged provider keys");
        }

        // Required keys, fail fast in declared order
        for key in unit.required_keys() {
            if is_absent(&section, key) {
                return Err(Error::missing_key(name, *key));
            }
        }

        // Defaults
        for (key, value) in unit.defaults() {
            fill(&mut section, key, value);
        }

        // Workers
        if let (Some(field), Some(workers)) = (unit.worker_field(), generic.get(WORKERS_KEY)) {
            section.insert(field.to_string(), workers.clone());
        }

        unit.validate(&section)?;

        unit.derive(&mut section, &DeriveContext { generic: &generic })?;
        tracing::debug!(keys = section.len(), "Backend section resolved");

        let globals = document.section_or_default(GENERIC_SECTION);
        unit.propagate(&section, globals, roles);
        generic::record_backend(globals, name, roles);
        document.insert_section(name, section);
        Ok(())
    }
}

/// Shallow merge: copy keys from `provider` that `target` lacks (or holds
/// as `null`).
///
/// Returns how many keys were inherited.
pub fn merge_missing(target: &mut Section, provider: &Section) -> usize {
    let mut inherited = 0;
    for (key, value) in provider {
        if is_absent(target, key) {
            target.insert(key.clone(), value.clone());
            inherited += 1;
        }
    }
    inherited
}

fn local_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
