//! CLI command definitions and dispatch.

pub mod attach;

use clap::{Parser, Subcommand};
use nsattach_common::constants::{BIN_NAME, DEFAULT_NETWORK_NAME};
use nsattach_common::types::Operation;

/// nsattach: attach a network namespace to a CNI plugin chain.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Name of the network configuration list to apply.
    #[arg(long, global = true, default_value = DEFAULT_NETWORK_NAME)]
    pub network: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Attach the network to a namespace.
    Add(attach::NetnsArgs),
    /// Verify an existing attachment.
    Check(attach::NetnsArgs),
    /// Detach the network from a namespace.
    #[command(alias = "delete")]
    Del(attach::NetnsArgs),
}

impl Command {
    /// Returns the lifecycle verb selected by this subcommand.
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Add(_) => Operation::Add,
            Self::Check(_) => Operation::Check,
            Self::Del(_) => Operation::Delete,
        }
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the attach pipeline fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let operation = cli.command.operation();
    let (Command::Add(args) | Command::Check(args) | Command::Del(args)) = cli.command;
    attach::execute(operation, args, cli.network)
}
