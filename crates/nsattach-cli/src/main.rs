//! # nsattach
//!
//! Attaches a network namespace to a CNI network configuration list.
//! Protocol parameters are read from `NETCONFPATH`, `CNI_PATH`,
//! `CAP_ARGS`, `CNI_ARGS`, and `CNI_IFNAME`.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

mod commands;
mod plan;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use crate::commands::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    exit_code(commands::execute(cli), &mut std::io::stderr())
}

/// Maps a command outcome to the process exit status, writing any error
/// message to `stderr` on its own line.
fn exit_code(outcome: anyhow::Result<()>, stderr: &mut dyn Write) -> ExitCode {
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(stderr, "{e}");
            ExitCode::FAILURE
        }
    }
}
