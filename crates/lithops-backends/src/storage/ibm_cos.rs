//! IBM Cloud Object Storage

use crate::providers::{IBM, first_credential};
use lithops_config::derive::{
    bucket_name, check_bucket_name, check_url, fill_with, regional_endpoint, req_str,
    scoped_bucket_name,
};
use lithops_config::{
    BackendKind, DeriveContext, Error, NormalizationUnit, ProviderLink, Result, Section,
};
use serde_json::json;

const PUBLIC_ENDPOINT: &str = "https://s3.{region}.cloud-object-storage.appdomain.cloud";
const PRIVATE_ENDPOINT: &str = "https://s3.private.{region}.cloud-object-storage.appdomain.cloud";

const CREDENTIALS: &[&str] = &["iam_api_key", "api_key", "access_key_id"];

/// COS storage. Authenticates with an IAM API key, a COS API key, or an
/// HMAC key pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct IbmCos;

impl NormalizationUnit for IbmCos {
    fn name(&self) -> &str {
        "ibm_cos"
    }

    fn kinds(&self) -> &[BackendKind] {
        &[BackendKind::Storage]
    }

    fn provider(&self) -> Option<ProviderLink<'_>> {
        Some(ProviderLink::optional(IBM))
    }

    fn required_keys(&self) -> &[&str] {
        &["region"]
    }

    fn validate(&self, section: &Section) -> Result<()> {
        match first_credential(section, self.name(), CREDENTIALS)? {
            None => return Err(Error::missing_key(self.name(), "iam_api_key")),
            Some(("access_key_id", _)) => {
                req_str(section, self.name(), "secret_access_key")?;
            }
            Some(_) => {}
        }
        check_url(section, self.name(), "endpoint")?;
        check_url(section, self.name(), "private_endpoint")?;
        check_bucket_name(section, self.name(), "storage_bucket")
    }

    fn derive(&self, section: &mut Section, _ctx: &DeriveContext<'_>) -> Result<()> {
        fill_with(section, "endpoint", |s| {
            let region = req_str(s, "ibm_cos", "region")?;
            Ok(json!(regional_endpoint(PUBLIC_ENDPOINT, region)))
        })?;
        fill_with(section, "private_endpoint", |s| {
            let region = req_str(s, "ibm_cos", "region")?;
            Ok(json!(regional_endpoint(PRIVATE_ENDPOINT, region)))
        })?;
        fill_with(section, "storage_bucket", |s| {
            let endpoint = req_str(s, "ibm_cos", "endpoint")?;
            let name = match first_credential(s, "ibm_cos", CREDENTIALS)? {
                // HMAC access key ids are not secret
                Some(("access_key_id", key)) => bucket_name(key, endpoint),
                Some((_, api_key)) => {
                    let region = req_str(s, "ibm_cos", "region")?;
                    scoped_bucket_name(region, &format!("{api_key}:{endpoint}"))
                }
                None => return Err(Error::missing_key("ibm_cos", "iam_api_key")),
            };
            Ok(json!(name))
        })
    }
}
