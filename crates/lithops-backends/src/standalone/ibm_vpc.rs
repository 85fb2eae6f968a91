//! IBM Cloud VPC virtual servers

use super::{EXEC_MODES, check_dismantle_timeouts, require_for_consume};
use crate::providers::IBM;
use lithops_config::derive::{check_choice, check_url, fill_with, regional_endpoint, req_str};
use lithops_config::{BackendKind, DeriveContext, NormalizationUnit, ProviderLink, Result, Section};
use serde_json::{Value, json};

const ENDPOINT_TEMPLATE: &str = "https://{region}.iaas.cloud.ibm.com";

#[derive(Debug, Default, Clone, Copy)]
pub struct IbmVpc;

impl NormalizationUnit for IbmVpc {
    fn name(&self) -> &str {
        "ibm_vpc"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Standalone]
    }

    fn provider(&self) -> Option<ProviderLink<'_>> {
        Some(ProviderLink::optional(IBM))
    }

    fn required_keys(&self) -> &[&str] {
        &["iam_api_key", "region"]
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("exec_mode", json!("consume")),
            ("ssh_username", json!("root")),
            ("worker_profile_name", json!("cx2-2x4")),
            ("master_profile_name", json!("cx2-2x4")),
            ("delete_on_dismantle", json!(true)),
            ("soft_dismantle_timeout", json!(300)),
            ("hard_dismantle_timeout", json!(3600)),
            ("worker_processes", json!("AUTO")),
        ]
    }

    fn worker_field(&self) -> Option<&str> {
        Some("max_workers")
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_choice(section, self.name(), "exec_mode", EXEC_MODES)?;
        require_for_consume(section, self.name(), &["instance_id", "floating_ip"])?;
        check_url(section, self.name(), "endpoint")?;
        check_dismantle_timeouts(section, self.name())
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        fill_with(section, "endpoint", |s| {
            let region = req_str(s, "ibm_vpc", "region")?;
            Ok(json!(regional_endpoint(ENDPOINT_TEMPLATE, region)))
        })?;
        fill_with(section, "zone", |s| {
            let region = req_str(s, "ibm_vpc", "region")?;
            Ok(json!(format!("{region}-2")))
        })
    }
}
