//! AWS Lambda

use crate::providers::{AWS, aws_user_key};
use lithops_config::derive::{check_choice, check_range, fill_with, regional_endpoint, req_str};
use lithops_config::{
    BackendKind, DeriveContext, Error, NormalizationUnit, ProviderLink, Result, Section,
};
use serde_json::{Value, json};

const ENDPOINT_TEMPLATE: &str = "https://lambda.{region}.amazonaws.com";

#[derive(Debug, Default, Clone, Copy)]
pub struct AwsLambda;

impl NormalizationUnit for AwsLambda {
    fn name(&self) -> &str {
        "aws_lambda"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Compute]
    }

    fn provider(&self) -> Option<ProviderLink<'_>> {
        Some(ProviderLink::mandatory(AWS))
    }

    fn required_keys(&self) -> &[&str] {
        &["access_key_id", "secret_access_key", "region", "execution_role"]
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("runtime_memory", json!(256)),
            ("runtime_timeout", json!(180)),
            ("worker_processes", json!(1)),
            ("invoke_pool_threads", json!(64)),
            ("architecture", json!("x86_64")),
            ("ephemeral_storage", json!(512)),
        ]
    }

    fn worker_field(&self) -> Option<&str> {
        Some("max_workers")
    }

    fn validate(&self, section: &Section) -> Result<()> {
        let role = req_str(section, self.name(), "execution_role")?;
        if !role.starts_with("arn:aws:iam::") {
            return Err(Error::invalid(
                self.name(),
                "execution_role",
                format!("'{role}' is not an IAM role ARN"),
            ));
        }
        check_range(section, self.name(), "runtime_memory", 128..=10240)?;
        check_range(section, self.name(), "runtime_timeout", 1..=900)?;
        check_range(section, self.name(), "ephemeral_storage", 512..=10240)?;
        check_choice(section, self.name(), "architecture", &["x86_64", "arm64"])
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        fill_with(section, "endpoint", |s| {
            let region = req_str(s, "aws_lambda", "region")?;
            Ok(json!(regional_endpoint(ENDPOINT_TEMPLATE, region)))
        })?;
        fill_with(section, "user_key", |s| Ok(json!(aws_user_key(s, "aws_lambda")?)))
    }
}
