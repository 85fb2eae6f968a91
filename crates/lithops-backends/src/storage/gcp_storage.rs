//! Google Cloud Storage

use crate::providers::GCP;
use lithops_config::derive::{check_bucket_name, fill_with, opt_str, req_str, scoped_bucket_name};
use lithops_config::{BackendKind, DeriveContext, NormalizationUnit, ProviderLink, Result, Section};
use serde_json::json;

#[derive(Debug, Default, Clone, Copy)]
pub struct GcpStorage;

impl NormalizationUnit for GcpStorage {
    fn name(&self) -> &str {
        "gcp_storage"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Storage]
    }

    fn provider(&self) -> Option<ProviderLink<'_>> {
        Some(ProviderLink::mandatory(GCP))
    }

    fn required_keys(&self) -> &[&str] {
        &["region", "credentials_path"]
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_bucket_name(section, self.name(), "storage_bucket")
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        fill_with(section, "storage_bucket", |s| {
            let region = req_str(s, "gcp_storage", "region")?;
            // The project is the natural account scope; the credentials
            // file stands in when it is not spelled out.
            let seed = match opt_str(s, "gcp_storage", "project_name")? {
                Some(project) => project,
                None => req_str(s, "gcp_storage", "credentials_path")?,
            };
            Ok(json!(scoped_bucket_name(region, seed)))
        })
    }
}
