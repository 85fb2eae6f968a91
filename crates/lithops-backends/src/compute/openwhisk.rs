//! Apache OpenWhisk

use lithops_config::derive::{check_range, check_url};
use lithops_config::{BackendKind, NormalizationUnit, Result, Section};
use serde_json::{Value, json};

/// A self-hosted OpenWhisk deployment; everything comes from its own
/// section.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenWhisk;

impl NormalizationUnit for OpenWhisk {
    fn name(&self) -> &str {
        "openwhisk"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Compute]
    }

    fn required_keys(&self) -> &[&str] {
        &["endpoint", "namespace", "api_key"]
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("insecure", json!(false)),
            ("runtime_memory", json!(256)),
            ("runtime_timeout", json!(600)),
            ("worker_processes", json!(1)),
        ]
    }

    fn worker_field(&self) -> Option<&str> {
        Some("max_workers")
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_url(section, self.name(), "endpoint")?;
        check_range(section, self.name(), "runtime_timeout", 1..=600)
    }
}
