//! The generic `lithops` section and backend selection
//!
//! The generic section carries the platform-wide defaults and names the
//! backends a run uses. [`BackendSelection`] turns it into the ordered list
//! of backends the [`Resolver`](crate::Resolver) normalizes.

use crate::derive::{check_choice, fill, opt_str, opt_u64};
use crate::document::{ConfigDocument, Section};
use crate::unit::BackendKind;
use crate::{Error, Result};
use serde_json::{Value, json};

/// Name of the generic platform section.
pub const GENERIC_SECTION: &str = "lithops";

/// Key holding the platform-wide worker count.
pub const WORKERS_KEY: &str = "workers";

pub const DEFAULT_COMPUTE_BACKEND: &str = "aws_lambda";
pub const DEFAULT_STANDALONE_BACKEND: &str = "aws_ec2";
pub const DEFAULT_STORAGE_BACKEND: &str = "aws_s3";
pub const LOCALHOST_BACKEND: &str = "localhost";

const MONITORING_CHOICES: &[&str] = &["storage", "rabbitmq"];

/// How the platform executes functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Serverless,
    Standalone,
    Localhost,
}

impl ExecutionMode {
    pub const ALL: [&'static str; 3] = ["serverless", "standalone", "localhost"];

    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionMode::Serverless => "serverless",
            ExecutionMode::Standalone => "standalone",
            ExecutionMode::Localhost => "localhost",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "serverless" => Some(ExecutionMode::Serverless),
            "standalone" => Some(ExecutionMode::Standalone),
            "localhost" => Some(ExecutionMode::Localhost),
            _ => None,
        }
    }

    fn default_backend(self) -> &'static str {
        match self {
            ExecutionMode::Serverless => DEFAULT_COMPUTE_BACKEND,
            ExecutionMode::Standalone => DEFAULT_STANDALONE_BACKEND,
            ExecutionMode::Localhost => LOCALHOST_BACKEND,
        }
    }

    fn default_storage(self) -> &'static str {
        match self {
            ExecutionMode::Localhost => LOCALHOST_BACKEND,
            _ => DEFAULT_STORAGE_BACKEND,
        }
    }
}

fn read_mode(generic: &Section) -> Result<ExecutionMode> {
    match opt_str(generic, GENERIC_SECTION, "mode")? {
        None => Ok(ExecutionMode::default()),
        Some(value) => ExecutionMode::parse(value).ok_or_else(|| {
            Error::invalid(
                GENERIC_SECTION,
                "mode",
                format!("'{value}' is not one of {}", ExecutionMode::ALL.join(", ")),
            )
        }),
    }
}

/// Generic key naming the backend selected for `kind`.
pub(crate) fn role_key(kind: BackendKind) -> &'static str {
    match kind {
        BackendKind::Storage => "storage",
        BackendKind::Compute | BackendKind::Standalone => "backend",
    }
}

/// Inject the generic defaults and validate the generic section in place.
///
/// An absent `workers` count becomes `parallelism`. The `backend` and
/// `storage` keys are left alone; they are written as backends resolve.
pub(crate) fn normalize_generic(generic: &mut Section, parallelism: usize) -> Result<()> {
    let mode = read_mode(generic)?;
    check_choice(generic, GENERIC_SECTION, "monitoring", MONITORING_CHOICES)?;
    if let Some(0) = opt_u64(generic, GENERIC_SECTION, WORKERS_KEY)? {
        return Err(Error::invalid(
            GENERIC_SECTION,
            WORKERS_KEY,
            "must be at least 1",
        ));
    }

    let defaults: [(&str, Value); 7] = [
        ("mode", json!(mode.as_str())),
        (WORKERS_KEY, json!(parallelism)),
        ("monitoring", json!("storage")),
        ("execution_timeout", json!(1800)),
        ("chunksize", json!(1)),
        ("data_limit", json!(4)),
        ("log_level", json!("INFO")),
    ];
    for (key, value) in defaults {
        fill(generic, key, value);
    }
    Ok(())
}

/// Name `backend` in the generic section under every role it resolved for.
pub(crate) fn record_backend(generic: &mut Section, backend: &str, roles: &[BackendKind]) {
    for kind in roles {
        generic.insert(role_key(*kind).to_string(), json!(backend));
    }
}

/// The backends a run uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSelection {
    pub storage: String,
    pub compute: Option<String>,
    pub standalone: Option<String>,
}

impl BackendSelection {
    /// Select a storage backend only.
    pub fn storage(name: impl Into<String>) -> Self {
        Self {
            storage: name.into(),
            compute: None,
            standalone: None,
        }
    }

    pub fn with_compute(mut self, name: impl Into<String>) -> Self {
        self.compute = Some(name.into());
        self
    }

    pub fn with_standalone(mut self, name: impl Into<String>) -> Self {
        self.standalone = Some(name.into());
        self
    }

    /// Read the selection out of the generic section.
    ///
    /// `mode` decides whether `backend` names a compute or a standalone
    /// backend; absent values fall back to the mode's defaults. A missing
    /// generic section means all defaults.
    pub fn from_generic(document: &ConfigDocument) -> Result<Self> {
        let empty = Section::new();
        let generic = document.section(GENERIC_SECTION).unwrap_or(&empty);
        let mode = read_mode(generic)?;

        let backend = opt_str(generic, GENERIC_SECTION, "backend")?
            .unwrap_or(mode.default_backend())
            .to_string();
        let storage = opt_str(generic, GENERIC_SECTION, "storage")?
            .unwrap_or(mode.default_storage())
            .to_string();

        let selection = match mode {
            ExecutionMode::Standalone => Self::storage(storage).with_standalone(backend),
            ExecutionMode::Serverless | ExecutionMode::Localhost => {
                Self::storage(storage).with_compute(backend)
            }
        };
        Ok(selection)
    }

    /// Backends in resolution order, with the role each is selected for.
    ///
    /// Storage comes first so the bucket it publishes into the generic
    /// section is visible to the units that follow.
    pub fn ordered(&self) -> Vec<(&str, BackendKind)> {
        let mut out = vec![(self.storage.as_str(), BackendKind::Storage)];
        if let Some(compute) = &self.compute {
            out.push((compute.as_str(), BackendKind::Compute));
        }
        if let Some(standalone) = &self.standalone {
            out.push((standalone.as_str(), BackendKind::Standalone));
        }
        out
    }
}
