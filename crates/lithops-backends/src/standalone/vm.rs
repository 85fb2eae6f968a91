//! A single pre-existing virtual machine reached over SSH

use lithops_config::derive::check_range;
use lithops_config::{BackendKind, NormalizationUnit, Result, Section};
use serde_json::{Value, json};

#[derive(Debug, Default, Clone, Copy)]
pub struct Vm;

impl NormalizationUnit for Vm {
    fn name(&self) -> &str {
        "vm"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Standalone]
    }

    fn required_keys(&self) -> &[&str] {
        &["ip_address"]
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![("ssh_username", json!("root")), ("ssh_port", json!(22))]
    }

    fn worker_field(&self) -> Option<&str> {
        Some("worker_processes")
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_range(section, self.name(), "ssh_port", 1..=65535)?;
        check_range(section, self.name(), "worker_processes", 1..=4096)
    }
}
