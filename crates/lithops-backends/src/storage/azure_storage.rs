//! Azure Blob Storage

use crate::providers::AZURE;
use lithops_config::derive::{bucket_name, check_bucket_name, check_url, fill_with, req_str};
use lithops_config::{BackendKind, DeriveContext, NormalizationUnit, ProviderLink, Result, Section};
use serde_json::json;

#[derive(Debug, Default, Clone, Copy)]
pub struct AzureStorage;

impl NormalizationUnit for AzureStorage {
    fn name(&self) -> &str {
        "azure_storage"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Storage]
    }

    fn provider(&self) -> Option<ProviderLink<'_>> {
        Some(ProviderLink::mandatory(AZURE))
    }

    fn required_keys(&self) -> &[&str] {
        &["storage_account_name", "storage_account_key"]
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_url(section, self.name(), "endpoint")?;
        check_bucket_name(section, self.name(), "storage_bucket")
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        fill_with(section, "endpoint", |s| {
            let account = req_str(s, "azure_storage", "storage_account_name")?;
            Ok(json!(format!("https://{account}.blob.core.windows.net")))
        })?;
        fill_with(section, "storage_bucket", |s| {
            let account = req_str(s, "azure_storage", "storage_account_name")?;
            let endpoint = req_str(s, "azure_storage", "endpoint")?;
            Ok(json!(bucket_name(account, endpoint)))
        })
    }
}
