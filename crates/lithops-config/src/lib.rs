//! Configuration resolution engine for the Lithops platform
//!
//! A Lithops configuration document has one generic `lithops` section,
//! provider sections holding shared credentials (`aws`, `ibm`, ...) and one
//! section per pluggable backend. Before the platform starts, every backend
//! in use is normalized through one pipeline:
//!
//! - **Registry**: [`BackendRegistry`] maps a backend name to its
//!   [`NormalizationUnit`]
//! - **Units**: each backend declares required keys, defaults and derived
//!   fields
//! - **Resolver**: [`Resolver`] merges provider credentials, validates,
//!   defaults, derives and propagates, backend by backend
//!
//! # Example
//!
//! ```
//! use lithops_config::{BackendRegistry, ConfigDocument, Resolver};
//!
//! let registry = BackendRegistry::new();
//! let resolver = Resolver::new(&registry);
//! let resolved = resolver.resolve(ConfigDocument::new(), &[]).unwrap();
//! assert_eq!(resolved.get_str("lithops", "mode"), Some("serverless"));
//! ```

pub mod derive;
pub mod document;
pub mod error;
pub mod generic;
pub mod pipeline;
pub mod registry;
pub mod unit;

pub use document::{ConfigDocument, Format, ResolvedDocument, Section};
pub use error::{Error, Result};
pub use generic::{BackendSelection, ExecutionMode, GENERIC_SECTION, WORKERS_KEY};
pub use pipeline::{Resolver, merge_missing};
pub use registry::BackendRegistry;
pub use unit::{BackendKind, DeriveContext, NormalizationUnit, ProviderLink};
