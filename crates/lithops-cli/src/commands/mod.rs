//! Command implementations for lithops-cli

pub mod backends;
pub mod controller;
pub mod resolve;

pub use backends::run_backends;
pub use controller::{run_get, run_scale};
pub use resolve::{Overrides, run_resolve};
