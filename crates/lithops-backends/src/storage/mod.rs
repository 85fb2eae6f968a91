//! Object storage backends

mod aws_s3;
mod azure_storage;
mod gcp_storage;
mod ibm_cos;
mod redis;
mod s3_compatible;
mod swift;

pub use aws_s3::AwsS3;
pub use azure_storage::AzureStorage;
pub use gcp_storage::GcpStorage;
pub use ibm_cos::IbmCos;
pub use redis::Redis;
pub use s3_compatible::S3Compatible;
pub use swift::Swift;
