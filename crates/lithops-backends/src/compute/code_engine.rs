//! IBM Code Engine

use crate::providers::IBM;
use lithops_config::derive::{
    check_choice, check_number_choice, check_range, fill_with, regional_endpoint, req_str,
};
use lithops_config::{BackendKind, DeriveContext, NormalizationUnit, ProviderLink, Result, Section};
use serde_json::{Value, json};

const ENDPOINT_TEMPLATE: &str = "https://api.{region}.codeengine.cloud.ibm.com";
const REGIONS: &[&str] = &[
    "us-south", "us-east", "ca-tor", "br-sao", "eu-de", "eu-gb", "eu-es", "jp-osa", "jp-tok",
    "au-syd",
];
const CPUS: &[f64] = &[0.125, 0.25, 0.5, 1.0, 2.0, 4.0, 6.0, 8.0];

#[derive(Debug, Default, Clone, Copy)]
pub struct CodeEngine;

impl NormalizationUnit for CodeEngine {
    fn name(&self) -> &str {
        "code_engine"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Compute]
    }

    fn provider(&self) -> Option<ProviderLink<'_>> {
        Some(ProviderLink::optional(IBM))
    }

    fn required_keys(&self) -> &[&str] {
        &["iam_api_key", "region"]
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("runtime_cpu", json!(0.125)),
            ("runtime_memory", json!(256)),
            ("runtime_timeout", json!(600)),
            ("worker_processes", json!(1)),
            ("docker_server", json!("docker.io")),
        ]
    }

    fn worker_field(&self) -> Option<&str> {
        Some("max_workers")
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_choice(section, self.name(), "region", REGIONS)?;
        check_number_choice(section, self.name(), "runtime_cpu", CPUS)?;
        check_range(section, self.name(), "runtime_memory", 128..=32768)
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        fill_with(section, "endpoint", |s| {
            let region = req_str(s, "code_engine", "region")?;
            Ok(json!(regional_endpoint(ENDPOINT_TEMPLATE, region)))
        })
    }
}
