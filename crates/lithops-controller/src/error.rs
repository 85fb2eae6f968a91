//! Error types for lithops-controller

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// A fault below the HTTP application layer.
///
/// Everything but [`TransportError::Request`] is worth retrying.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request could not be built: {0}")]
    Request(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("response body incomplete: {0}")]
    Body(String),

    #[error("response body is not JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Control plane unreachable after {attempts} attempt(s): {source}")]
    TransportFault {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    #[error("Controller rejected the request with status {status}: {body}")]
    ControllerRejected { status: u16, body: String },

    #[error("Cannot read controller context from {origin}: {message}")]
    ContextUnreadable { origin: String, message: String },

    #[error("Call cancelled before the next attempt")]
    Cancelled,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid retry policy: {0}")]
    InvalidPolicy(String),

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

impl Error {
    pub(crate) fn context(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ContextUnreadable {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Whether another attempt could succeed.
    ///
    /// Only transport faults qualify; a rejection is the controller's answer.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::TransportFault { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_faults_are_retryable() {
        let fault = Error::TransportFault {
            attempts: 3,
            source: TransportError::Timeout("10s elapsed".into()),
        };
        assert!(fault.is_retryable());
        assert!(fault.to_string().contains("3 attempt(s)"));

        let rejected = Error::ControllerRejected {
            status: 400,
            body: "bad role".into(),
        };
        assert!(!rejected.is_retryable());
        assert!(!Error::Cancelled.is_retryable());
    }

    #[test]
    fn transport_fault_keeps_its_cause() {
        use std::error::Error as _;
        let fault = Error::TransportFault {
            attempts: 1,
            source: TransportError::Connect("refused".into()),
        };
        let cause = fault.source().expect("cause attached");
        assert_eq!(cause.to_string(), "connection failed: refused");
    }
}
