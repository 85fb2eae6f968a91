//! Kubernetes jobs and Knative services

use lithops_config::derive::{check_choice, check_range, opt_u64};
use lithops_config::{BackendKind, Error, NormalizationUnit, Result, Section};
use serde_json::{Value, json};

/// Batch jobs on any Kubernetes cluster reachable through the local
/// kubeconfig.
#[derive(Debug, Default, Clone, Copy)]
pub struct K8s;

impl NormalizationUnit for K8s {
    fn name(&self) -> &str {
        "k8s"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Compute]
    }

    fn section_mandatory(&self) -> bool {
        false
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("docker_server", json!("docker.io")),
            ("namespace", json!("default")),
            ("runtime_cpu", json!(1)),
            ("runtime_memory", json!(512)),
            ("runtime_timeout", json!(600)),
            ("worker_processes", json!(1)),
        ]
    }

    fn worker_field(&self) -> Option<&str> {
        Some("max_workers")
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_range(section, self.name(), "runtime_memory", 128..=262144)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Knative;

impl NormalizationUnit for Knative {
    fn name(&self) -> &str {
        "knative"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Compute]
    }

    fn section_mandatory(&self) -> bool {
        false
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("networking_layer", json!("kourier")),
            ("docker_server", json!("docker.io")),
            ("runtime_cpu", json!(0.5)),
            ("runtime_memory", json!(256)),
            ("runtime_timeout", json!(600)),
            ("worker_processes", json!(1)),
            ("concurrency", json!(1)),
            ("min_instances", json!(0)),
            ("max_instances", json!(250)),
        ]
    }

    fn worker_field(&self) -> Option<&str> {
        Some("max_workers")
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_choice(
            section,
            self.name(),
            "networking_layer",
            &["kourier", "istio", "contour"],
        )?;
        check_range(section, self.name(), "concurrency", 1..=1000)?;
        let min = opt_u64(section, self.name(), "min_instances")?.unwrap_or(0);
        if let Some(max) = opt_u64(section, self.name(), "max_instances")? {
            if min > max {
                return Err(Error::invalid(
                    self.name(),
                    "min_instances",
                    format!("{min} exceeds max_instances {max}"),
                ));
            }
        }
        Ok(())
    }
}
