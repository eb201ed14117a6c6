//! CLI arguments.

use clap::{Parser, Subcommand};

/// EVM execution toolkit.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Execute bytecode as a call against a fresh in-memory state.
    Run {
        /// Hex-encoded bytecode of the called contract.
        #[arg(long)]
        code: String,

        /// Hex-encoded calldata.
        #[arg(long, default_value = "")]
        calldata: String,

        /// Gas limit of the transaction.
        #[arg(long, default_value_t = 30_000_000)]
        gas: u64,

        /// Hardfork to execute under.
        #[arg(long, default_value = "cancun")]
        fork: String,

        /// Wei transferred with the call.
        #[arg(long, default_value_t = 0)]
        value: u64,

        /// Stream an EIP-3155 trace to stderr while executing.
        #[arg(long)]
        trace: bool,

        /// Print the result as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },

    /// List the supported hardforks with their mainnet activation blocks.
    Forks,
}
