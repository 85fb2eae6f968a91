//! The normalization unit contract
//!
//! Every backend the platform can run on implements [`NormalizationUnit`]:
//! it declares which keys it needs, what it defaults, and how it derives
//! computed fields. The [`Resolver`](crate::Resolver) drives all units
//! through the same ordered steps, so a unit never touches the document
//! itself.

use crate::document::Section;
use crate::Result;
use serde_json::Value;
use std::fmt;

/// The role a backend plays on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackendKind {
    /// Object storage used for payloads and results
    Storage,
    /// Serverless / container compute
    Compute,
    /// Standalone virtual machines
    Standalone,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Storage => "storage",
            BackendKind::Compute => "compute",
            BackendKind::Standalone => "standalone",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backend's dependency on a provider (credential) section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderLink<'a> {
    /// Name of the provider section, e.g. `aws`
    pub section: &'a str,
    /// Whether resolution fails when the provider section is absent
    pub mandatory: bool,
}

impl<'a> ProviderLink<'a> {
    pub const fn mandatory(section: &'a str) -> Self {
        Self {
            section,
            mandatory: true,
        }
    }

    pub const fn optional(section: &'a str) -> Self {
        Self {
            section,
            mandatory: false,
        }
    }
}

/// Values a unit sees besides its own section.
#[derive(Debug, Clone, Copy)]
pub struct DeriveContext<'a> {
    /// The generic platform section, already defaulted
    pub generic: &'a Section,
}

/// Per-backend normalization: required keys, defaults and derivations.
///
/// Implementations must be pure: the same section in gives the same section
/// out, with no I/O, randomness or clock reads. Derivations only fill keys
/// that are absent, which is what makes re-resolution idempotent.
pub trait NormalizationUnit: Send + Sync {
    /// Registry name, also the name of the backend's section.
    fn name(&self) -> &str;

    /// Roles this backend can be selected for.
    fn kinds(&self) -> &[BackendKind];

    /// Provider section whose keys fill gaps in the backend section.
    fn provider(&self) -> Option<ProviderLink<'_>> {
        None
    }

    /// Whether the backend's own section must be present in the input.
    ///
    /// Backends that inherit credentials from a provider usually accept an
    /// absent section and start from an empty one.
    fn section_mandatory(&self) -> bool {
        self.provider().is_none()
    }

    /// Keys that must be present once the provider merge is done, in the
    /// order they are checked.
    fn required_keys(&self) -> &[&str] {
        &[]
    }

    /// Key/value pairs injected when the key is absent.
    fn defaults(&self) -> Vec<(&'static str, Value)> {
        Vec::new()
    }

    /// Field receiving the platform-wide worker count.
    fn worker_field(&self) -> Option<&str> {
        None
    }

    /// Semantic checks on the complete section, run after defaults and the
    /// worker count are in place.
    fn validate(&self, _section: &Section) -> Result<()> {
        Ok(())
    }

    /// Compute fields that depend on other resolved fields.
    fn derive(&self, _section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Copy values upward into the generic section once this backend has
    /// resolved.
    ///
    /// `roles` are the kinds this backend was selected for. Selected as
    /// storage, it publishes its `storage_bucket` as the platform-wide
    /// default bucket.
    fn propagate(&self, section: &Section, generic: &mut Section, roles: &[BackendKind]) {
        if roles.contains(&BackendKind::Storage) {
            if let Some(bucket) = section.get("storage_bucket") {
                generic.insert("storage_bucket".into(), bucket.clone());
            }
        }
    }

    fn supports(&self, kind: BackendKind) -> bool {
        self.kinds().contains(&kind)
    }
}
