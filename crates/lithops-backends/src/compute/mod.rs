//! Compute backends

mod aws_batch;
mod aws_lambda;
mod azure_functions;
mod code_engine;
mod gcp;
mod ibm_cf;
mod k8s;
mod openwhisk;

pub use aws_batch::AwsBatch;
pub use aws_lambda::AwsLambda;
pub use azure_functions::AzureFunctions;
pub use code_engine::CodeEngine;
pub use gcp::{GcpCloudRun, GcpFunctions};
pub use ibm_cf::IbmCf;
pub use k8s::{K8s, Knative};
pub use openwhisk::OpenWhisk;
