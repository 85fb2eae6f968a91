//! Self-hosted S3-compatible object stores (MinIO, Ceph RGW, ...)

use lithops_config::derive::{bucket_name, check_bucket_name, check_url, fill_with, req_str};
use lithops_config::{BackendKind, DeriveContext, NormalizationUnit, ProviderLink, Result, Section};
use serde_json::json;

/// An S3-compatible store reachable at an explicit endpoint.
///
/// The same unit serves every such store; only the section name (and an
/// optional credentials section) differ.
#[derive(Debug, Clone)]
pub struct S3Compatible {
    name: String,
    provider: Option<String>,
}

impl S3Compatible {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: None,
        }
    }

    /// Inherit credentials from a provider section.
    pub fn with_provider(mut self, section: impl Into<String>) -> Self {
        self.provider = Some(section.into());
        self
    }

    pub fn minio() -> Self {
        Self::new("minio")
    }

    pub fn ceph() -> Self {
        Self::new("ceph")
    }
}

impl NormalizationUnit for S3Compatible {
    fn name(&self) -> &str {
        &self.name
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Storage]
    }

    fn provider(&self) -> Option<ProviderLink<'_>> {
        self.provider.as_deref().map(ProviderLink::optional)
    }

    fn section_mandatory(&self) -> bool {
        true
    }

    fn required_keys(&self) -> &[&str] {
        &["access_key_id", "secret_access_key", "endpoint"]
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_url(section, &self.name, "endpoint")?;
        check_bucket_name(section, &self.name, "storage_bucket")
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        fill_with(section, "storage_bucket", |s| {
            let key = req_str(s, &self.name, "access_key_id")?;
            let endpoint = req_str(s, &self.name, "endpoint")?;
            Ok(json!(bucket_name(key, endpoint)))
        })
    }
}
