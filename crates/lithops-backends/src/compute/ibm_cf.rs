//! IBM Cloud Functions

use crate::providers::{IBM, first_credential};
use lithops_config::derive::{check_range, check_url, fill_with, req_str, url_host};
use lithops_config::{
    BackendKind, DeriveContext, Error, NormalizationUnit, ProviderLink, Result, Section,
};
use serde_json::{Value, json};

#[derive(Debug, Default, Clone, Copy)]
pub struct IbmCf;

impl NormalizationUnit for IbmCf {
    fn name(&self) -> &str {
        "ibm_cf"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Compute]
    }

    fn provider(&self) -> Option<ProviderLink<'_>> {
        Some(ProviderLink::optional(IBM))
    }

    fn section_mandatory(&self) -> bool {
        true
    }

    fn required_keys(&self) -> &[&str] {
        &["endpoint", "namespace"]
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("runtime_memory", json!(256)),
            ("runtime_timeout", json!(600)),
            ("worker_processes", json!(1)),
            ("invoke_pool_threads", json!(500)),
        ]
    }

    fn worker_field(&self) -> Option<&str> {
        Some("max_workers")
    }

    fn validate(&self, section: &Section) -> Result<()> {
        if first_credential(section, self.name(), &["iam_api_key", "api_key"])?.is_none() {
            return Err(Error::missing_key(self.name(), "iam_api_key"));
        }
        check_url(section, self.name(), "endpoint")?;
        check_range(section, self.name(), "runtime_memory", 128..=2048)?;
        check_range(section, self.name(), "runtime_timeout", 1..=600)
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        // https://us-south.functions.cloud.ibm.com -> us-south
        fill_with(section, "region", |s| {
            let endpoint = req_str(s, "ibm_cf", "endpoint")?;
            let host = url_host(endpoint);
            let region = host.split('.').next().unwrap_or(host);
            Ok(json!(region))
        })
    }
}
