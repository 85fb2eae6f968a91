//! AWS Batch

use crate::providers::{AWS, aws_user_key};
use lithops_config::derive::{
    check_choice, check_number_choice, check_range, fill_with, opt_str, regional_endpoint,
    req_str,
};
use lithops_config::{
    BackendKind, DeriveContext, Error, NormalizationUnit, ProviderLink, Result, Section,
};
use serde_json::{Value, json};

const ENDPOINT_TEMPLATE: &str = "https://batch.{region}.amazonaws.com";
const ENV_TYPES: &[&str] = &["EC2", "SPOT", "FARGATE", "FARGATE_SPOT"];
const FARGATE_CPUS: &[f64] = &[0.25, 0.5, 1.0, 2.0, 4.0];

#[derive(Debug, Default, Clone, Copy)]
pub struct AwsBatch;

impl NormalizationUnit for AwsBatch {
    fn name(&self) -> &str {
        "aws_batch"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Compute]
    }

    fn provider(&self) -> Option<ProviderLink<'_>> {
        Some(ProviderLink::mandatory(AWS))
    }

    fn required_keys(&self) -> &[&str] {
        &[
            "access_key_id",
            "secret_access_key",
            "region",
            "execution_role",
            "subnets",
            "security_groups",
        ]
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("env_type", json!("FARGATE_SPOT")),
            ("env_max_cpus", json!(10)),
            ("runtime_memory", json!(1024)),
            ("runtime_cpu", json!(0.5)),
            ("runtime_timeout", json!(180)),
            ("worker_processes", json!(1)),
            ("assign_public_ip", json!(true)),
        ]
    }

    fn worker_field(&self) -> Option<&str> {
        Some("max_workers")
    }

    fn validate(&self, section: &Section) -> Result<()> {
        for key in ["subnets", "security_groups"] {
            if !section.get(key).is_some_and(Value::is_array) {
                return Err(Error::invalid(self.name(), key, "expected a list of ids"));
            }
        }
        check_choice(section, self.name(), "env_type", ENV_TYPES)?;
        match opt_str(section, self.name(), "env_type")? {
            // EC2 environments launch instances that need their own role
            Some("EC2") | Some("SPOT") => {
                req_str(section, self.name(), "instance_role")?;
            }
            _ => check_number_choice(section, self.name(), "runtime_cpu", FARGATE_CPUS)?,
        }
        check_range(section, self.name(), "runtime_memory", 512..=122880)?;
        check_range(section, self.name(), "env_max_cpus", 1..=10000)
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        fill_with(section, "endpoint", |s| {
            let region = req_str(s, "aws_batch", "region")?;
            Ok(json!(regional_endpoint(ENDPOINT_TEMPLATE, region)))
        })?;
        fill_with(section, "user_key", |s| Ok(json!(aws_user_key(s, "aws_batch")?)))
    }
}
