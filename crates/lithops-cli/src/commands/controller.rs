//! The get and scale commands

use colored::Colorize;
use lithops_controller::{ContextSource, ControllerClient, RetryPolicy};
use std::time::Duration;

use super::resolve::load_document;
use crate::cli::ControllerArgs;
use crate::error::Result;

/// Config section holding the retry policy.
const CONTROLLER_SECTION: &str = "controller";

/// Run the get command
pub fn run_get(path: &str, args: &ControllerArgs) -> Result<()> {
    let client = connect(args)?;
    let value = client.get(path)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Run the scale command
pub fn run_scale(role: &str, cardinality: u64, args: &ControllerArgs) -> Result<()> {
    let client = connect(args)?;
    let ack = client.scale(cardinality, role)?;
    println!(
        "{} {} workers for role {}",
        "Reported".green().bold(),
        ack.cardinality,
        ack.role.cyan()
    );
    Ok(())
}

fn connect(args: &ControllerArgs) -> Result<ControllerClient> {
    let policy = retry_policy(args)?;
    let mut source = ContextSource::default();
    if let Some(path) = &args.context_file {
        source.context_file = path.clone();
    }
    if let Some(path) = &args.token_file {
        source.token_file = path.clone();
    }
    tracing::debug!(?policy, "Connecting to the controller");
    Ok(ControllerClient::connect(&source, policy)?)
}

/// Policy from the `[controller]` section, then command-line flags.
fn retry_policy(args: &ControllerArgs) -> Result<RetryPolicy> {
    let document = load_document(&args.config)?;
    let mut policy = match document.section(CONTROLLER_SECTION) {
        Some(section) => RetryPolicy::from_section(section)?,
        None => RetryPolicy::default(),
    };
    if let Some(attempts) = args.attempts {
        policy = policy.with_max_attempts(attempts);
    }
    if let Some(ms) = args.base_delay_ms {
        policy = policy.with_base_delay(Duration::from_millis(ms));
    }
    if let Some(ms) = args.timeout_ms {
        policy = policy.with_request_timeout(Duration::from_millis(ms));
    }
    Ok(policy.validate()?)
}
