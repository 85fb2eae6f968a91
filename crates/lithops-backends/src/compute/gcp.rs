//! Google Cloud Functions and Cloud Run
//!
//! Both read the service account key and region from the `gcp` section.

use crate::providers::GCP;
use lithops_config::derive::{check_choice, check_number_choice, check_range, fill_with, req_str};
use lithops_config::{BackendKind, DeriveContext, NormalizationUnit, ProviderLink, Result, Section};
use serde_json::{Value, json};

const FUNCTION_MEMORY: &[f64] = &[128.0, 256.0, 512.0, 1024.0, 2048.0, 4096.0, 8192.0];
const CLOUDRUN_CPUS: &[f64] = &[0.25, 0.5, 1.0, 2.0, 4.0, 6.0, 8.0];

fn derive_project(section: &mut Section, backend: &'static str) -> Result<()> {
    // Without an explicit project, the key file is named after it
    fill_with(section, "project_name", |s| {
        let account = req_str(s, backend, "credentials_path")?;
        let stem = account
            .rsplit('/')
            .next()
            .unwrap_or(account)
            .trim_end_matches(".json");
        Ok(json!(stem))
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GcpFunctions;

impl NormalizationUnit for GcpFunctions {
    fn name(&self) -> &str {
        "gcp_functions"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Compute]
    }

    fn provider(&self) -> Option<ProviderLink<'_>> {
        Some(ProviderLink::mandatory(GCP))
    }

    fn required_keys(&self) -> &[&str] {
        &["region", "credentials_path"]
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("runtime_memory", json!(256)),
            ("runtime_timeout", json!(300)),
            ("worker_processes", json!(1)),
            ("invoke_pool_threads", json!(1000)),
            ("trigger", json!("pub/sub")),
        ]
    }

    fn worker_field(&self) -> Option<&str> {
        Some("max_workers")
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_choice(section, self.name(), "trigger", &["https", "pub/sub"])?;
        check_number_choice(section, self.name(), "runtime_memory", FUNCTION_MEMORY)?;
        check_range(section, self.name(), "runtime_timeout", 1..=540)
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        derive_project(section, "gcp_functions")
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GcpCloudRun;

impl NormalizationUnit for GcpCloudRun {
    fn name(&self) -> &str {
        "gcp_cloudrun"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Compute]
    }

    fn provider(&self) -> Option<ProviderLink<'_>> {
        Some(ProviderLink::mandatory(GCP))
    }

    fn required_keys(&self) -> &[&str] {
        &["region", "credentials_path"]
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("runtime_cpu", json!(0.25)),
            ("runtime_memory", json!(256)),
            ("runtime_timeout", json!(300)),
            ("worker_processes", json!(1)),
            ("container_registry", json!("gcr.io")),
        ]
    }

    fn worker_field(&self) -> Option<&str> {
        Some("max_workers")
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_number_choice(section, self.name(), "runtime_cpu", CLOUDRUN_CPUS)?;
        check_range(section, self.name(), "runtime_memory", 128..=32768)?;
        check_range(section, self.name(), "runtime_timeout", 1..=3600)
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        derive_project(section, "gcp_cloudrun")
    }
}
