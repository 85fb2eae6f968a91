//! Built-in Lithops backends
//!
//! One [`NormalizationUnit`] per storage, compute and standalone backend
//! the platform ships with. [`builtin_registrations`] is the single list of
//! them; everything else (the shared [`builtin_registry`], fresh registries
//! from [`registry_with_builtins`]) derives from it.
//!
//! ```
//! use lithops_backends::builtin_registry;
//! use lithops_config::BackendKind;
//!
//! let registry = builtin_registry();
//! assert!(registry.contains("aws_lambda"));
//! assert!(registry.by_kind(BackendKind::Storage).contains(&"aws_s3"));
//! ```

pub mod compute;
mod localhost;
pub mod providers;
pub mod standalone;
pub mod storage;

pub use localhost::Localhost;

use lithops_config::{BackendRegistry, NormalizationUnit};
use std::sync::{Arc, OnceLock};

/// Number of built-in backends.
pub const BUILTIN_COUNT: usize = 22;

/// Returns every built-in unit.
pub fn builtin_registrations() -> Vec<Arc<dyn NormalizationUnit>> {
    vec![
        // Storage (8)
        Arc::new(storage::AwsS3),
        Arc::new(storage::IbmCos),
        Arc::new(storage::GcpStorage),
        Arc::new(storage::AzureStorage),
        Arc::new(storage::S3Compatible::minio()),
        Arc::new(storage::S3Compatible::ceph()),
        Arc::new(storage::Redis),
        Arc::new(storage::Swift),
        // Storage and compute (1)
        Arc::new(Localhost),
        // Compute (10)
        Arc::new(compute::AwsLambda),
        Arc::new(compute::AwsBatch),
        Arc::new(compute::IbmCf),
        Arc::new(compute::CodeEngine),
        Arc::new(compute::GcpFunctions),
        Arc::new(compute::GcpCloudRun),
        Arc::new(compute::AzureFunctions),
        Arc::new(compute::K8s),
        Arc::new(compute::Knative),
        Arc::new(compute::OpenWhisk),
        // Standalone (3)
        Arc::new(standalone::AwsEc2),
        Arc::new(standalone::IbmVpc),
        Arc::new(standalone::Vm),
    ]
}

/// A fresh registry holding every built-in unit, open for extension.
pub fn registry_with_builtins() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    for unit in builtin_registrations() {
        registry.register_shared(unit);
    }
    registry
}

/// The process-wide built-in registry, initialized on first use.
pub fn builtin_registry() -> &'static BackendRegistry {
    static REGISTRY: OnceLock<BackendRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let registry = registry_with_builtins();
        tracing::debug!(backends = registry.len(), "Built-in backend registry initialized");
        registry
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lithops_config::BackendKind;

    #[test]
    fn builtin_count_matches_registrations() {
        assert_eq!(builtin_registrations().len(), BUILTIN_COUNT);
        // No duplicate names
        assert_eq!(registry_with_builtins().len(), BUILTIN_COUNT);
    }

    #[test]
    fn shared_registry_is_initialized_once() {
        let a = builtin_registry() as *const BackendRegistry;
        let b = builtin_registry() as *const BackendRegistry;
        assert_eq!(a, b);
    }

    #[test]
    fn localhost_serves_two_roles() {
        let registry = builtin_registry();
        assert!(registry.by_kind(BackendKind::Storage).contains(&"localhost"));
        assert!(registry.by_kind(BackendKind::Compute).contains(&"localhost"));
    }

    #[test]
    fn standalone_backends() {
        assert_eq!(
            builtin_registry().by_kind(BackendKind::Standalone),
            vec!["aws_ec2", "ibm_vpc", "vm"]
        );
    }
}
