//! Redis used as an object store

use lithops_config::derive::{check_range, req_str};
use lithops_config::{BackendKind, NormalizationUnit, Result, Section};
use serde_json::{Value, json};

#[derive(Debug, Default, Clone, Copy)]
pub struct Redis;

impl NormalizationUnit for Redis {
    fn name(&self) -> &str {
        "redis"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Storage]
    }

    fn required_keys(&self) -> &[&str] {
        &["host"]
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("port", json!(6379)),
            ("db", json!(0)),
            ("storage_bucket", json!("storage")),
        ]
    }

    fn validate(&self, section: &Section) -> Result<()> {
        req_str(section, self.name(), "host")?;
        check_range(section, self.name(), "port", 1..=65535)?;
        check_range(section, self.name(), "db", 0..=15)
    }
}
