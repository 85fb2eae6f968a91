//! Whole-document resolution against the built-in backends
//!
//! Documents are written to disk in every supported format and resolved
//! through the shared registry, the way a deployment would.

use lithops_backends::builtin_registry;
use lithops_config::{ConfigDocument, Error, Format, ResolvedDocument, Resolver};
use lithops_test_utils::{TestWorkspace, fixtures};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use std::num::NonZeroUsize;

fn resolve(doc: ConfigDocument) -> lithops_config::Result<ResolvedDocument> {
    Resolver::new(builtin_registry())
        .with_parallelism(NonZeroUsize::new(2).unwrap())
        .resolve_configured(doc)
}

fn serverless() -> ConfigDocument {
    fixtures::all_backends()
        .with("lithops", "backend", "aws_lambda")
        .with("lithops", "storage", "aws_s3")
}

#[test]
fn every_format_resolves_to_the_same_document() {
    let ws = TestWorkspace::new();
    let doc = serverless();

    let mut resolved = Vec::new();
    for (name, format) in [
        ("lithops.yaml", Format::Yaml),
        ("lithops.toml", Format::Toml),
        ("lithops.json", Format::Json),
    ] {
        let path = ws.write_config(name, &doc, format);
        let loaded = ConfigDocument::load(&path).unwrap();
        resolved.push(resolve(loaded).unwrap());
    }

    assert_eq!(resolved[0], resolved[1]);
    assert_eq!(resolved[1], resolved[2]);
}

#[test]
fn platform_sees_one_storage_bucket() {
    let resolved = resolve(serverless()).unwrap();
    let bucket = resolved.get_str("aws_s3", "storage_bucket").unwrap();

    assert_eq!(resolved.get_str("lithops", "storage_bucket"), Some(bucket));
    assert!(bucket.starts_with("lithops-"));
}

#[test]
fn provider_keys_do_not_override_backend_keys() {
    let doc = serverless().with("aws_lambda", "region", "eu-central-1");
    let resolved = resolve(doc).unwrap();

    assert_eq!(resolved.get_str("aws_lambda", "region"), Some("eu-central-1"));
    assert_eq!(
        resolved.get_str("aws_lambda", "endpoint"),
        Some("https://lambda.eu-central-1.amazonaws.com")
    );
    // The storage backend still inherits the provider region
    assert_eq!(resolved.get_str("aws_s3", "region"), Some("us-east-1"));
}

#[test]
fn failure_leaves_the_input_untouched() {
    let doc = serverless().with("aws_lambda", "runtime_memory", 1);
    let before = doc.clone();

    let err = resolve(doc.clone()).unwrap_err();
    assert!(matches!(err, Error::InvalidValue { ref key, .. } if key == "runtime_memory"));
    assert_eq!(doc, before);
}

#[test]
fn switching_mode_switches_the_resolved_backends() {
    let doc = fixtures::all_backends()
        .with("lithops", "mode", "standalone")
        .with("lithops", "backend", "ibm_vpc")
        .with("lithops", "storage", "ibm_cos");
    let resolved = resolve(doc).unwrap();

    assert_eq!(resolved.get_str("ibm_vpc", "zone"), Some("us-south-2"));
    assert!(resolved.get_str("lithops", "storage_bucket").unwrap().starts_with("lithops-us-south-"));
    assert!(resolved.section("aws_lambda").unwrap().get("endpoint").is_none());
}

#[test]
fn local_parallelism_sizes_every_worker_pool() {
    let resolved = Resolver::new(builtin_registry())
        .with_parallelism(NonZeroUsize::new(3).unwrap())
        .resolve(fixtures::all_backends(), &["aws_s3", "aws_lambda"])
        .unwrap();

    assert_eq!(resolved.get("lithops", "workers"), Some(&json!(3)));
    assert_eq!(resolved.get("aws_lambda", "max_workers"), Some(&json!(3)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn workers_land_verbatim_and_resolution_is_idempotent(
        workers in 1u64..5000,
        backend in prop::sample::select(vec!["aws_lambda", "aws_batch", "code_engine", "k8s", "knative", "openwhisk"]),
    ) {
        let doc = serverless()
            .with("lithops", "backend", backend)
            .with("lithops", "workers", workers);

        let once = resolve(doc).unwrap();
        prop_assert_eq!(once.get(backend, "max_workers"), Some(&json!(workers)));

        let twice = resolve(once.clone().into_document()).unwrap();
        prop_assert_eq!(once, twice);
    }
}
