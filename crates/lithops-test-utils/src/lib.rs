//! Shared test utilities for the Lithops configuration workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`]: provider and backend documents that resolve cleanly
//! - [`workspace`]: [`TestWorkspace`] for config files and controller
//!   context files on disk
//! - [`controller`]: [`MockController`], a scripted HTTP control plane

pub mod controller;
pub mod fixtures;
pub mod workspace;

pub use controller::{MockController, MockResponse, RecordedRequest};
pub use workspace::TestWorkspace;
