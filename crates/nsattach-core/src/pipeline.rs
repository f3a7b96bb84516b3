//! End-to-end attach pipeline.
//!
//! Parameters, identity, and configuration are all resolved before the
//! orchestrator is touched; the first failure ends the request.

use std::io::Write;

use nsattach_common::config::AttachEnv;
use nsattach_common::error::Result;
use nsattach_common::types::Operation;

use crate::conflist::ConfigLoader;
use crate::dispatch::{NetworkOrchestrator, RuntimeRequest, dispatch};
use crate::{identity, params};

/// One namespace-attachment request as received at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachCommand {
    /// Lifecycle verb to dispatch.
    pub operation: Operation,
    /// Namespace path, possibly relative to the working directory.
    pub netns: String,
    /// Name of the network configuration list to apply.
    pub network: String,
}

/// Runs one attach request against the given collaborators.
///
/// # Errors
///
/// Returns the first failure from parameter validation, path resolution,
/// configuration loading, or the orchestrator. Orchestrator errors are
/// passed through unchanged.
pub fn attach(
    command: &AttachCommand,
    env: &AttachEnv,
    loader: &dyn ConfigLoader,
    orchestrator: &dyn NetworkOrchestrator,
    out: &mut dyn Write,
) -> Result<RuntimeRequest> {
    let params = params::collect(env)?;
    let identity = identity::derive(&command.netns)?;
    let list = loader.load_config_list(&params.net_dir, &command.network)?;

    let request = RuntimeRequest::assemble(params, identity, command.operation);
    dispatch(orchestrator, &list, &request, out)?;
    Ok(request)
}
