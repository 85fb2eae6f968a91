//! Retry policy and cancellation

use crate::{Error, Result};
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use lithops_config::Section;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How hard a control-plane call tries before giving up.
///
/// Deserializes from a config section with millisecond durations:
///
/// ```toml
/// [controller]
/// max_attempts = 5
/// base_delay_ms = 250
/// request_timeout_ms = 5000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    #[serde(rename = "base_delay_ms", with = "millis")]
    pub base_delay: Duration,
    #[serde(rename = "request_timeout_ms", with = "millis")]
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Read a policy from a config section; absent keys keep their defaults.
    pub fn from_section(section: &Section) -> Result<Self> {
        let policy: Self = serde_json::from_value(serde_json::Value::Object(section.clone()))
            .map_err(|e| Error::InvalidPolicy(e.to_string()))?;
        policy.validate()
    }

    pub fn validate(self) -> Result<Self> {
        if self.max_attempts == 0 {
            return Err(Error::InvalidPolicy("max_attempts must be at least 1".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::InvalidPolicy("request_timeout_ms must be positive".into()));
        }
        Ok(self)
    }

    /// Delay schedule: `base`, `2 * base`, `4 * base`, ... with no jitter.
    ///
    /// The schedule never runs out; the attempt limit is enforced by the
    /// caller.
    pub(crate) fn schedule(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.base_delay)
            .with_multiplier(2.0)
            .with_randomization_factor(0.0)
            .with_max_interval(Duration::from_secs(u32::MAX as u64))
            .with_max_elapsed_time(None)
            .build()
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Shared flag that stops a call before its next attempt.
///
/// An attempt already on the wire is never interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
