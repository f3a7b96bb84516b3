//! End-to-end tests for the attach pipeline.
//!
//! Both collaborators are replaced by recording stubs so each test can
//! assert exactly what reached the loader and the orchestrator.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use nsattach_common::config::AttachEnv;
use nsattach_common::error::{AttachError, ErrorKind, Result};
use nsattach_common::types::Operation;
use nsattach_core::conflist::{ConfigLoader, DirectoryLoader, NetworkConfigList};
use nsattach_core::dispatch::{AttachResult, NetworkOrchestrator, RuntimeRequest};
use nsattach_core::{AttachCommand, attach};
use serde_json::json;

// ── Stubs ────────────────────────────────────────────────────────────

#[derive(Default)]
struct StubLoader {
    requests: RefCell<Vec<(PathBuf, String)>>,
    missing: bool,
}

impl ConfigLoader for StubLoader {
    fn load_config_list(&self, dir: &Path, name: &str) -> Result<NetworkConfigList> {
        self.requests
            .borrow_mut()
            .push((dir.to_path_buf(), name.to_string()));
        if self.missing {
            return Err(AttachError::NetworkNotFound {
                dir: dir.to_path_buf(),
                name: name.to_string(),
            });
        }
        NetworkConfigList::from_bytes(
            Path::new("stub.conflist"),
            format!(r#"{{"cniVersion":"1.0.0","name":"{name}","plugins":[{{"type":"bridge"}}]}}"#)
                .as_bytes(),
        )
    }
}

#[derive(Default)]
struct StubOrchestrator {
    calls: RefCell<Vec<(Operation, String, RuntimeRequest)>>,
    result: Option<serde_json::Value>,
}

impl StubOrchestrator {
    fn record(&self, op: Operation, list: &NetworkConfigList, request: &RuntimeRequest) {
        self.calls
            .borrow_mut()
            .push((op, list.name.clone(), request.clone()));
    }
}

impl NetworkOrchestrator for StubOrchestrator {
    fn add(
        &self,
        list: &NetworkConfigList,
        request: &RuntimeRequest,
    ) -> Result<Option<AttachResult>> {
        self.record(Operation::Add, list, request);
        Ok(self.result.clone().map(AttachResult::new))
    }

    fn check(&self, list: &NetworkConfigList, request: &RuntimeRequest) -> Result<()> {
        self.record(Operation::Check, list, request);
        Ok(())
    }

    fn delete(&self, list: &NetworkConfigList, request: &RuntimeRequest) -> Result<()> {
        self.record(Operation::Delete, list, request);
        Ok(())
    }
}

fn command(operation: Operation, netns: &str) -> AttachCommand {
    AttachCommand {
        operation,
        netns: netns.into(),
        network: "cbr1".into(),
    }
}

fn plugin_path_empty_env() -> AttachEnv {
    AttachEnv {
        cni_path: Some(String::new()),
        ..AttachEnv::default()
    }
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn add_with_defaults_reaches_orchestrator_with_exact_request() {
    let loader = StubLoader::default();
    let orchestrator = StubOrchestrator::default();
    let mut out = Vec::new();

    let request = attach(
        &command(Operation::Add, "/var/run/netns/test1"),
        &plugin_path_empty_env(),
        &loader,
        &orchestrator,
        &mut out,
    )
    .expect("attach should succeed");

    assert_eq!(request.if_name, "eth1");
    assert_eq!(request.net_ns, "/var/run/netns/test1");
    assert!(request.plugin_path.is_empty());
    assert!(request.capability_args.is_empty());
    assert!(request.args.is_empty());

    let hex = request
        .container_id
        .as_str()
        .strip_prefix("cnitool-")
        .expect("container ID prefix");
    assert_eq!(hex.len(), 20);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));

    let calls = orchestrator.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, Operation::Add);
    assert_eq!(calls[0].1, "cbr1");
    assert_eq!(calls[0].2, request);
}

#[test]
fn absent_net_dir_passes_default_directory_to_loader() {
    let loader = StubLoader::default();
    let orchestrator = StubOrchestrator::default();
    let mut out = Vec::new();

    let _ = attach(
        &command(Operation::Add, "/var/run/netns/test1"),
        &AttachEnv::default(),
        &loader,
        &orchestrator,
        &mut out,
    )
    .unwrap();

    assert_eq!(
        *loader.requests.borrow(),
        vec![(PathBuf::from("/etc/cni/net.d"), "cbr1".to_string())]
    );
}

#[test]
fn explicit_net_dir_is_passed_to_loader() {
    let loader = StubLoader::default();
    let env = AttachEnv {
        net_dir: Some("/opt/cni/conf".into()),
        ..AttachEnv::default()
    };
    let mut out = Vec::new();

    let _ = attach(
        &command(Operation::Check, "/var/run/netns/test1"),
        &env,
        &loader,
        &StubOrchestrator::default(),
        &mut out,
    )
    .unwrap();

    assert_eq!(loader.requests.borrow()[0].0, PathBuf::from("/opt/cni/conf"));
}

#[test]
fn loader_failure_prevents_any_orchestrator_call() {
    let loader = StubLoader {
        missing: true,
        ..StubLoader::default()
    };
    let orchestrator = StubOrchestrator::default();
    let mut out = Vec::new();

    let err = attach(
        &command(Operation::Add, "/var/run/netns/test1"),
        &AttachEnv::default(),
        &loader,
        &orchestrator,
        &mut out,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Load);
    assert!(orchestrator.calls.borrow().is_empty());
}

#[test]
fn config_error_prevents_loading_and_dispatch() {
    let loader = StubLoader::default();
    let orchestrator = StubOrchestrator::default();
    let env = AttachEnv {
        cni_args: Some("a=1;b".into()),
        ..AttachEnv::default()
    };
    let mut out = Vec::new();

    let err = attach(
        &command(Operation::Add, "/var/run/netns/test1"),
        &env,
        &loader,
        &orchestrator,
        &mut out,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(err.to_string().contains("\"b\""));
    assert!(loader.requests.borrow().is_empty());
    assert!(orchestrator.calls.borrow().is_empty());
}

#[test]
fn malformed_capability_args_abort_before_dispatch() {
    let orchestrator = StubOrchestrator::default();
    let env = AttachEnv {
        capability_args: Some("{\"portMappings\":".into()),
        ..AttachEnv::default()
    };
    let mut out = Vec::new();

    let err = attach(
        &command(Operation::Add, "/var/run/netns/test1"),
        &env,
        &StubLoader::default(),
        &orchestrator,
        &mut out,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(orchestrator.calls.borrow().is_empty());
}

#[test]
fn empty_namespace_argument_resolves_to_working_directory() {
    let orchestrator = StubOrchestrator::default();
    let mut out = Vec::new();

    let request = attach(
        &command(Operation::Add, ""),
        &AttachEnv::default(),
        &StubLoader::default(),
        &orchestrator,
        &mut out,
    )
    .expect("empty namespace argument should resolve");

    let cwd = std::env::current_dir().expect("working directory");
    assert_eq!(Path::new(&request.net_ns), cwd.as_path());
    assert_eq!(orchestrator.calls.borrow().len(), 1);
}

#[test]
fn check_and_delete_receive_same_request_shape_as_add() {
    let env = AttachEnv {
        capability_args: Some(r#"{"mac":"0a:58:0a:f4:00:05"}"#.into()),
        cni_args: Some("IgnoreUnknown=1;K8S_POD_NAME=web".into()),
        ifname: Some("net1".into()),
        ..AttachEnv::default()
    };

    let mut requests = Vec::new();
    for op in [Operation::Add, Operation::Check, Operation::Delete] {
        let orchestrator = StubOrchestrator::default();
        let mut out = Vec::new();
        let _ = attach(
            &command(op, "/var/run/netns/ns0"),
            &env,
            &StubLoader::default(),
            &orchestrator,
            &mut out,
        )
        .unwrap();

        let calls = orchestrator.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, op);
        requests.push(calls[0].2.clone());
    }

    for request in &requests {
        assert_eq!(request.container_id, requests[0].container_id);
        assert_eq!(request.if_name, "net1");
        assert_eq!(request.capability_args["mac"], "0a:58:0a:f4:00:05");
        assert_eq!(
            request.args,
            vec![
                ("IgnoreUnknown".to_string(), "1".to_string()),
                ("K8S_POD_NAME".to_string(), "web".to_string()),
            ]
        );
    }
}

#[test]
fn add_result_is_written_to_output() {
    let orchestrator = StubOrchestrator {
        result: Some(json!({"cniVersion": "1.0.0", "interfaces": [{"name": "eth1"}]})),
        ..StubOrchestrator::default()
    };
    let mut out = Vec::new();

    let _ = attach(
        &command(Operation::Add, "/var/run/netns/test1"),
        &AttachEnv::default(),
        &StubLoader::default(),
        &orchestrator,
        &mut out,
    )
    .unwrap();

    let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(printed["interfaces"][0]["name"], "eth1");
}

#[test]
fn equivalent_paths_share_container_id() {
    let mut ids = Vec::new();
    for netns in ["/a/b/../b", "/a/b", "/a/./b/"] {
        let orchestrator = StubOrchestrator::default();
        let mut out = Vec::new();
        let request = attach(
            &command(Operation::Add, netns),
            &AttachEnv::default(),
            &StubLoader::default(),
            &orchestrator,
            &mut out,
        )
        .unwrap();
        assert_eq!(request.net_ns, "/a/b");
        ids.push(request.container_id);
    }
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn distinct_paths_get_distinct_container_ids() {
    let mut ids = Vec::new();
    for netns in ["/var/run/netns/ns", "/var/run/netns/ns/a", "/var/run/netns/ns/b"] {
        let mut out = Vec::new();
        let request = attach(
            &command(Operation::Delete, netns),
            &AttachEnv::default(),
            &StubLoader::default(),
            &StubOrchestrator::default(),
            &mut out,
        )
        .unwrap();
        ids.push(request.container_id);
    }
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
    assert_ne!(ids[0], ids[2]);
}

#[test]
fn directory_loader_feeds_pipeline() {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    std::fs::write(
        dir.path().join("10-cbr1.conflist"),
        r#"{"cniVersion":"1.0.0","name":"cbr1","plugins":[{"type":"bridge"},{"type":"firewall"}]}"#,
    )
    .expect("failed to write config");

    let env = AttachEnv {
        net_dir: Some(dir.path().to_string_lossy().into_owned()),
        ..AttachEnv::default()
    };
    let orchestrator = StubOrchestrator::default();
    let mut out = Vec::new();

    let _ = attach(
        &command(Operation::Add, "/var/run/netns/test1"),
        &env,
        &DirectoryLoader,
        &orchestrator,
        &mut out,
    )
    .unwrap();

    assert_eq!(orchestrator.calls.borrow()[0].1, "cbr1");
}
