//! Resilient client for the Lithops elasticity controller
//!
//! Standalone deployments report their worker-pool size to an external
//! controller and read back values it publishes. Calls block, carry the
//! instance's token and identity, and retry transport faults on an
//! exponential schedule. A response the controller actively rejects is
//! never retried.
//!
//! ```no_run
//! use lithops_controller::{ContextSource, ControllerClient, RetryPolicy};
//!
//! let client = ControllerClient::connect(&ContextSource::default(), RetryPolicy::default())?;
//! client.scale(5, "worker")?;
//! # Ok::<(), lithops_controller::Error>(())
//! ```

pub mod client;
pub mod context;
pub mod error;
pub mod retry;
pub mod transport;

pub use client::{AUTH_TOKEN_HEADER, ControllerClient, INSTANCE_ID_HEADER, ScaleAck};
pub use context::{ContextSource, ControllerContext};
pub use error::{Error, Result, TransportError};
pub use retry::{CancellationToken, RetryPolicy};
pub use transport::{HttpTransport, Method, Request, Response, Transport};
