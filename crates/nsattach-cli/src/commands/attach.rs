//! `nsattach add|check|del`: run one lifecycle verb against a namespace.

use std::io::Write;

use clap::Args;
use nsattach_common::config::AttachEnv;
use nsattach_common::types::Operation;
use nsattach_core::conflist::DirectoryLoader;
use nsattach_core::{AttachCommand, attach};

use crate::plan::PlanOrchestrator;

/// Arguments shared by every lifecycle subcommand.
#[derive(Args, Debug)]
pub struct NetnsArgs {
    /// Path to the network namespace (e.g. /var/run/netns/test1).
    pub netns: String,
}

/// Executes one lifecycle verb.
///
/// The environment is snapshotted once here and not consulted again.
///
/// # Errors
///
/// Returns the pipeline error, whose message is reported to the user verbatim.
pub fn execute(operation: Operation, args: NetnsArgs, network: String) -> anyhow::Result<()> {
    let env = AttachEnv::from_process_env();
    run(
        operation,
        args,
        network,
        &env,
        std::io::stdout(),
        &mut std::io::stdout(),
    )
}

/// Runs one lifecycle verb with an explicit environment and output streams.
///
/// `plan_sink` receives check and del plans; `out` receives the add result.
///
/// # Errors
///
/// Returns the pipeline error unchanged.
pub fn run<W: Write>(
    operation: Operation,
    args: NetnsArgs,
    network: String,
    env: &AttachEnv,
    plan_sink: W,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let command = AttachCommand {
        operation,
        netns: args.netns,
        network,
    };
    let orchestrator = PlanOrchestrator::new(plan_sink);

    let request = attach(&command, env, &DirectoryLoader, &orchestrator, out)?;
    tracing::debug!(container_id = %request.container_id, "request completed");
    Ok(())
}
