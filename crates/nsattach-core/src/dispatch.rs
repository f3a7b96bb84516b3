//! Runtime request assembly and lifecycle dispatch.
//!
//! [`dispatch`] invokes exactly one orchestrator capability per request.
//! Orchestrator failures are returned as-is: no wrapping, no retry.

use std::io::Write;
use std::path::PathBuf;

use nsattach_common::error::Result;
use nsattach_common::types::{ContainerId, Operation};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::conflist::NetworkConfigList;
use crate::identity::NamespaceIdentity;
use crate::params::CollectedParams;

/// Everything the plugin chain needs to know about one attachment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeRequest {
    /// Deterministic ID derived from `net_ns`.
    #[serde(rename = "containerID")]
    pub container_id: ContainerId,
    /// Absolute namespace path.
    #[serde(rename = "netNS")]
    pub net_ns: String,
    /// Interface name inside the namespace.
    pub if_name: String,
    /// `CNI_ARGS` pairs in source order.
    pub args: Vec<(String, String)>,
    /// Capability data, empty when none was supplied.
    pub capability_args: Map<String, Value>,
    /// Plugin binary search path.
    #[serde(skip)]
    pub plugin_path: Vec<PathBuf>,
    /// Lifecycle verb to dispatch.
    pub operation: Operation,
}

impl RuntimeRequest {
    /// Combines validated parameters with the namespace identity.
    #[must_use]
    pub fn assemble(
        params: CollectedParams,
        identity: NamespaceIdentity,
        operation: Operation,
    ) -> Self {
        Self {
            container_id: identity.container_id,
            net_ns: identity.netns,
            if_name: params.ifname,
            args: params.cni_args,
            capability_args: params.capability_args,
            plugin_path: params.plugin_path,
            operation,
        }
    }
}

/// Result payload returned by a successful add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttachResult(Value);

impl AttachResult {
    /// Wraps a plugin result document.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the result document.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Writes the result as indented JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn print(&self, out: &mut dyn Write) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, &self.0)?;
        writeln!(out)
    }
}

/// Executes a configuration list against a namespace.
///
/// Implementations own plugin discovery, invocation, and result
/// aggregation. Errors should be returned through
/// [`AttachError::orchestrator`](nsattach_common::error::AttachError::orchestrator)
/// so their message reaches the caller unchanged.
pub trait NetworkOrchestrator {
    /// Attaches the network, optionally returning the chain's result.
    ///
    /// # Errors
    ///
    /// Returns an error if any plugin in the chain fails.
    fn add(
        &self,
        list: &NetworkConfigList,
        request: &RuntimeRequest,
    ) -> Result<Option<AttachResult>>;

    /// Verifies an existing attachment.
    ///
    /// # Errors
    ///
    /// Returns an error if the attachment is missing or inconsistent.
    fn check(&self, list: &NetworkConfigList, request: &RuntimeRequest) -> Result<()>;

    /// Detaches the network.
    ///
    /// # Errors
    ///
    /// Returns an error if any plugin in the chain fails.
    fn delete(&self, list: &NetworkConfigList, request: &RuntimeRequest) -> Result<()>;
}

/// Invokes the orchestrator capability selected by `request.operation`.
///
/// A result returned by `add` is printed to `out`. A failure to print is
/// logged and does not fail the request.
///
/// # Errors
///
/// Returns the orchestrator's error unchanged.
pub fn dispatch(
    orchestrator: &dyn NetworkOrchestrator,
    list: &NetworkConfigList,
    request: &RuntimeRequest,
    out: &mut dyn Write,
) -> Result<()> {
    tracing::info!(
        operation = %request.operation,
        network = %list.name,
        container_id = %request.container_id,
        netns = %request.net_ns,
        ifname = %request.if_name,
        "dispatching to plugin chain"
    );

    match request.operation {
        Operation::Add => {
            if let Some(result) = orchestrator.add(list, request)? {
                if let Err(e) = result.print(out) {
                    tracing::warn!(error = %e, "failed to print add result");
                }
            }
            Ok(())
        }
        Operation::Check => orchestrator.check(list, request),
        Operation::Delete => orchestrator.delete(list, request),
    }
}
