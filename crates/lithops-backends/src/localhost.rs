//! Local execution: processes on this machine, files on local disk

use lithops_config::derive::check_range;
use lithops_config::{BackendKind, NormalizationUnit, Result, Section};
use serde_json::{Value, json};

/// Runs both as the storage and as the compute backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct Localhost;

impl NormalizationUnit for Localhost {
    fn name(&self) -> &str {
        "localhost"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Storage, BackendKind::Compute]
    }

    fn section_mandatory(&self) -> bool {
        false
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("runtime", json!("python3")),
            ("storage_bucket", json!("storage")),
            ("version", json!(2)),
        ]
    }

    fn worker_field(&self) -> Option<&str> {
        Some("worker_processes")
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_range(section, self.name(), "worker_processes", 1..=4096)?;
        check_range(section, self.name(), "version", 1..=2)
    }
}
