//! The retrying control-plane client

use crate::context::{ContextSource, ControllerContext};
use crate::error::TransportError;
use crate::retry::{CancellationToken, RetryPolicy};
use crate::transport::{HttpTransport, Method, Request, Transport};
use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;

pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
pub const INSTANCE_ID_HEADER: &str = "X-Instance-Id";

/// Acknowledgement of a `scale` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleAck {
    pub role: String,
    pub cardinality: u64,
    /// Whatever the controller answered with (`null` for an empty body)
    pub response: Value,
}

/// Client for the elasticity controller.
///
/// Holds only the immutable context captured at construction, so one
/// client can be shared by any number of threads; every call retries on its
/// own.
#[derive(Debug)]
pub struct ControllerClient<T = HttpTransport> {
    context: ControllerContext,
    policy: RetryPolicy,
    transport: T,
    cancel: CancellationToken,
}

/// How a single attempt ended, short of success.
enum AttemptFault {
    Transport(TransportError),
    Rejected { status: u16, body: String },
}

impl ControllerClient<HttpTransport> {
    /// Discover the context from `source` and build an HTTP client.
    pub fn connect(source: &ContextSource, policy: RetryPolicy) -> Result<Self> {
        let context = ControllerContext::discover(source)?;
        Self::from_context(context, policy)
    }

    pub fn from_context(context: ControllerContext, policy: RetryPolicy) -> Result<Self> {
        let policy = policy.validate()?;
        let transport = HttpTransport::new(policy.request_timeout)?;
        Ok(Self::with_transport(context, policy, transport))
    }
}

impl<T: Transport> ControllerClient<T> {
    pub fn with_transport(context: ControllerContext, policy: RetryPolicy, transport: T) -> Self {
        Self {
            context,
            policy,
            transport,
            cancel: CancellationToken::new(),
        }
    }

    /// Use a caller-owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn context(&self) -> &ControllerContext {
        &self.context
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch a controller-published value from `<endpoint>/<path>`.
    pub fn get(&self, path: &str) -> Result<Value> {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return Err(Error::InvalidRequest("path is empty".into()));
        }
        self.call(Method::Get, path, None)
    }

    /// Report the desired worker count for `role`.
    pub fn scale(&self, cardinality: u64, role: &str) -> Result<ScaleAck> {
        let valid_role = !role.is_empty()
            && role
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_role {
            return Err(Error::InvalidRequest(format!("invalid role name '{role}'")));
        }

        let path = format!("service/role/{role}");
        let response = self.call(Method::Put, &path, Some(json!({ "cardinality": cardinality })))?;
        tracing::info!(role, cardinality, "Worker cardinality reported");
        Ok(ScaleAck {
            role: role.to_string(),
            cardinality,
            response,
        })
    }

    fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let request = Request {
            method,
            url: format!("{}/{path}", self.context.endpoint()),
            headers: vec![
                (AUTH_TOKEN_HEADER, self.context.token().to_string()),
                (INSTANCE_ID_HEADER, self.context.instance_id().to_string()),
            ],
            body,
            timeout: self.policy.request_timeout,
        };
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 0u32;

        let operation = || {
            if self.cancel.is_cancelled() {
                return Err(backoff::Error::permanent(Error::Cancelled));
            }
            attempt += 1;
            tracing::debug!(url = %request.url, attempt, "Calling controller");
            match self.attempt(&request) {
                Ok(value) => Ok(value),
                Err(AttemptFault::Rejected { status, body }) => {
                    Err(backoff::Error::permanent(Error::ControllerRejected { status, body }))
                }
                Err(AttemptFault::Transport(TransportError::Request(message))) => {
                    Err(backoff::Error::permanent(Error::InvalidRequest(message)))
                }
                Err(AttemptFault::Transport(source)) => {
                    let fault = Error::TransportFault {
                        attempts: attempt,
                        source,
                    };
                    if attempt >= max_attempts {
                        Err(backoff::Error::permanent(fault))
                    } else {
                        Err(backoff::Error::transient(fault))
                    }
                }
            }
        };
        let notify = |err: Error, delay: Duration| {
            tracing::warn!(error = %err, delay_ms = delay.as_millis() as u64, "Controller call failed, retrying");
        };

        backoff::retry_notify(self.policy.schedule(), operation, notify).map_err(|e| match e {
            backoff::Error::Permanent(err) => err,
            backoff::Error::Transient { err, .. } => err,
        })
    }

    fn attempt(&self, request: &Request) -> std::result::Result<Value, AttemptFault> {
        let response = self
            .transport
            .send(request)
            .map_err(AttemptFault::Transport)?;
        if !response.is_success() {
            return Err(AttemptFault::Rejected {
                status: response.status,
                body: response.body,
            });
        }
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body)
            .map_err(|e| AttemptFault::Transport(TransportError::Decode(e)))
    }
}
