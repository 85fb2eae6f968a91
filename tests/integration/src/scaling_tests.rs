//! Resolving a standalone deployment and reporting its size to the
//! elasticity controller

use lithops_backends::builtin_registry;
use lithops_config::{ConfigDocument, Resolver};
use lithops_controller::{ContextSource, ControllerClient, RetryPolicy};
use lithops_test_utils::{MockController, MockResponse, TestWorkspace, fixtures};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn client_for(ws: &TestWorkspace, controller: &MockController, policy: RetryPolicy) -> ControllerClient {
    let files = ws.write_context(&controller.url(), "i-standalone", "tok");
    let source = ContextSource {
        context_file: files.context_file,
        token_file: files.token_file,
        endpoint_env: "LITHOPS_TEST_NO_SUCH_VAR".into(),
    };
    ControllerClient::connect(&source, policy).unwrap()
}

#[test]
fn resolved_worker_count_is_reported() {
    let doc = fixtures::aws()
        .with("lithops", "mode", "standalone")
        .with("lithops", "workers", 12)
        .with("aws_ec2", "exec_mode", "create")
        .with("controller", "max_attempts", 4)
        .with("controller", "base_delay_ms", 10);
    let resolved = Resolver::new(builtin_registry()).resolve_configured(doc).unwrap();
    let workers = resolved.get("aws_ec2", "max_workers").and_then(|v| v.as_u64()).unwrap();
    assert_eq!(workers, 12);

    let policy = RetryPolicy::from_section(resolved.section("controller").unwrap()).unwrap();
    assert_eq!(policy.max_attempts, 4);

    let ws = TestWorkspace::new();
    let controller = MockController::start(vec![
        MockResponse::Drop,
        MockResponse::ok(json!({"cardinality": 12})),
    ]);
    let client = client_for(&ws, &controller, policy);

    let ack = client.scale(workers, "worker").unwrap();
    assert_eq!(ack.response, json!({"cardinality": 12}));
    assert_eq!(controller.request_count(), 2);
}

#[test]
fn one_client_serves_many_threads() {
    let ws = TestWorkspace::new();
    let controller = MockController::start(vec![MockResponse::ok(json!({"ok": true}))]);
    let client = Arc::new(client_for(
        &ws,
        &controller,
        RetryPolicy::default().with_base_delay(Duration::from_millis(10)),
    ));

    let handles: Vec<_> = (1..=4u64)
        .map(|n| {
            let client = Arc::clone(&client);
            std::thread::spawn(move || client.scale(n, "worker").map(|ack| ack.cardinality))
        })
        .collect();
    let mut reported: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();
    reported.sort();

    assert_eq!(reported, vec![1, 2, 3, 4]);
    assert_eq!(controller.request_count(), 4);
    for request in controller.requests() {
        assert_eq!(request.header("x-instance-id"), Some("i-standalone"));
    }
}

#[test]
fn empty_document_fails_before_any_network_call() {
    let err = Resolver::new(builtin_registry())
        .resolve_configured(ConfigDocument::new().with("lithops", "mode", "standalone"))
        .unwrap_err();
    assert!(err.is_configuration_invalid());
}
