//! Azure Functions

use crate::providers::AZURE;
use lithops_config::derive::{check_choice, check_range, fill_with, req_str};
use lithops_config::{BackendKind, DeriveContext, NormalizationUnit, ProviderLink, Result, Section};
use serde_json::{Value, json};

#[derive(Debug, Default, Clone, Copy)]
pub struct AzureFunctions;

impl NormalizationUnit for AzureFunctions {
    fn name(&self) -> &str {
        "azure_functions"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Compute]
    }

    fn provider(&self) -> Option<ProviderLink<'_>> {
        Some(ProviderLink::mandatory(AZURE))
    }

    fn required_keys(&self) -> &[&str] {
        &["resource_group", "region", "storage_account_name"]
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("invocation_type", json!("http")),
            ("runtime_timeout", json!(300)),
            ("worker_processes", json!(1)),
            ("invoke_pool_threads", json!(100)),
        ]
    }

    fn worker_field(&self) -> Option<&str> {
        Some("max_workers")
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_choice(section, self.name(), "invocation_type", &["http", "event"])?;
        check_range(section, self.name(), "runtime_timeout", 1..=600)
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        // Function apps are named after the storage account they share
        fill_with(section, "functionapp_name", |s| {
            let account = req_str(s, "azure_functions", "storage_account_name")?;
            Ok(json!(format!("lithops-{account}")))
        })
    }
}
