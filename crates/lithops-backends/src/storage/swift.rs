//! OpenStack Swift

use lithops_config::derive::{check_url, fill_with, req_str, scoped_bucket_name};
use lithops_config::{BackendKind, DeriveContext, NormalizationUnit, Result, Section};
use serde_json::json;

#[derive(Debug, Default, Clone, Copy)]
pub struct Swift;

impl NormalizationUnit for Swift {
    fn name(&self) -> &str {
        "swift"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Storage]
    }

    fn required_keys(&self) -> &[&str] {
        &["auth_url", "region", "user_id", "project_id", "password"]
    }

    fn validate(&self, section: &Section) -> Result<()> {
        check_url(section, self.name(), "auth_url")
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        fill_with(section, "storage_bucket", |s| {
            let region = req_str(s, "swift", "region")?;
            let user = req_str(s, "swift", "user_id")?;
            let project = req_str(s, "swift", "project_id")?;
            Ok(json!(scoped_bucket_name(region, &format!("{user}:{project}"))))
        })
    }
}
