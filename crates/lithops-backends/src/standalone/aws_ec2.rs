//! Amazon EC2 virtual machines

use super::{EXEC_MODES, check_dismantle_timeouts, require_for_consume};
use crate::providers::{AWS, AWS_CREDENTIALS, aws_user_key};
use lithops_config::derive::{check_choice, fill_with, regional_endpoint, req_str};
use lithops_config::{BackendKind, DeriveContext, NormalizationUnit, ProviderLink, Result, Section};
use serde_json::{Value, json};

const ENDPOINT_TEMPLATE: &str = "https://ec2.{region}.amazonaws.com";

#[derive(Debug, Default, Clone, Copy)]
pub struct AwsEc2;

impl NormalizationUnit for AwsEc2 {
    fn name(&self) -> &str {
        "aws_ec2"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Standalone]
    }

    fn provider(&self) -> Option<ProviderLink<'_>> {
        Some(ProviderLink::mandatory(AWS))
    }

    fn section_mandatory(&self) -> bool {
        false
    }

    fn required_keys(&self) -> &[&str] {
        &AWS_CREDENTIALS
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("exec_mode", json!("consume")),
            ("ssh_username", json!("ubuntu")),
            ("worker_instance_type", json!("t2.medium")),
            ("master_instance_type", json!("t2.micro")),
            ("request_spot_instances", json!(true)),
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
        require_for_consume(section, self.name(), &["instance_id"])?;
        check_dismantle_timeouts(section, self.name())
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        fill_with(section, "endpoint", |s| {
            let region = req_str(s, "aws_ec2", "region")?;
            Ok(json!(regional_endpoint(ENDPOINT_TEMPLATE, region)))
        })?;
        fill_with(section, "user_key", |s| Ok(json!(aws_user_key(s, "aws_ec2")?)))
    }
}
