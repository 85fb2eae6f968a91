//! Standalone (virtual machine) backends

mod aws_ec2;
mod ibm_vpc;
mod vm;

pub use aws_ec2::AwsEc2;
pub use ibm_vpc::IbmVpc;
pub use vm::Vm;

use lithops_config::derive::{is_absent, opt_str, opt_u64};
use lithops_config::{Error, Result, Section};

/// `consume` reuses one existing instance, `create` provisions workers on
/// demand, `reuse` keeps provisioned workers between runs.
pub(crate) const EXEC_MODES: &[&str] = &["consume", "create", "reuse"];

/// Keys that only become required when `exec_mode` is `consume`.
pub(crate) fn require_for_consume(section: &Section, backend: &str, keys: &[&str]) -> Result<()> {
    if opt_str(section, backend, "exec_mode")? != Some("consume") {
        return Ok(());
    }
    match keys.iter().find(|key| is_absent(section, key)) {
        Some(key) => Err(Error::missing_key(backend, *key)),
        None => Ok(()),
    }
}

pub(crate) fn check_dismantle_timeouts(section: &Section, backend: &str) -> Result<()> {
    let soft = opt_u64(section, backend, "soft_dismantle_timeout")?;
    let hard = opt_u64(section, backend, "hard_dismantle_timeout")?;
    if let (Some(soft), Some(hard)) = (soft, hard) {
        if soft > hard {
            return Err(Error::invalid(
                backend,
                "soft_dismantle_timeout",
                format!("{soft} exceeds hard_dismantle_timeout {hard}"),
            ));
        }
    }
    Ok(())
}
