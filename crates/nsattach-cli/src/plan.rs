//! Dry-run orchestrator used by the `nsattach` binary.
//!
//! Renders what would be sent to the plugin chain as a JSON document
//! instead of executing plugins. `add` returns the document as its
//! result so it flows through the normal result output; `check` and
//! `del` write it to the orchestrator's own sink.

use std::cell::RefCell;
use std::io::Write;

use nsattach_common::error::{AttachError, Result};
use nsattach_core::conflist::NetworkConfigList;
use nsattach_core::dispatch::{AttachResult, NetworkOrchestrator, RuntimeRequest};
use serde::Serialize;
use serde_json::Value;

/// Orchestrator that describes dispatches without executing them.
#[derive(Debug)]
pub struct PlanOrchestrator<W: Write> {
    sink: RefCell<W>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Plan<'a> {
    network: &'a NetworkConfigList,
    runtime_config: &'a RuntimeRequest,
    plugin_path: Vec<String>,
}

impl<W: Write> PlanOrchestrator<W> {
    /// Creates an orchestrator writing `check`/`del` plans to `sink`.
    pub const fn new(sink: W) -> Self {
        Self {
            sink: RefCell::new(sink),
        }
    }

    /// Consumes the orchestrator and returns its sink.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }

    fn render(list: &NetworkConfigList, request: &RuntimeRequest) -> Result<Value> {
        let plan = Plan {
            network: list,
            runtime_config: request,
            plugin_path: request
                .plugin_path
                .iter()
                .map(|dir| dir.display().to_string())
                .collect(),
        };
        serde_json::to_value(plan).map_err(AttachError::orchestrator)
    }

    fn emit(&self, list: &NetworkConfigList, request: &RuntimeRequest) -> Result<()> {
        let plan = AttachResult::new(Self::render(list, request)?);
        let mut sink = self.sink.borrow_mut();
        plan.print(&mut *sink).map_err(AttachError::orchestrator)
    }
}

impl<W: Write> NetworkOrchestrator for PlanOrchestrator<W> {
    fn add(
        &self,
        list: &NetworkConfigList,
        request: &RuntimeRequest,
    ) -> Result<Option<AttachResult>> {
        Self::render(list, request).map(|plan| Some(AttachResult::new(plan)))
    }

    fn check(&self, list: &NetworkConfigList, request: &RuntimeRequest) -> Result<()> {
        if list.disable_check {
            tracing::info!(network = %list.name, "network disables check; nothing to do");
            return Ok(());
        }
        self.emit(list, request)
    }

    fn delete(&self, list: &NetworkConfigList, request: &RuntimeRequest) -> Result<()> {
        self.emit(list, request)
    }
}
