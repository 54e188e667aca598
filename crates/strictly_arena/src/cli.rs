//! Command-line interface for strictly_arena.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Arena - staked checkers match server
#[derive(Parser, Debug)]
#[command(name = "strictly_arena")]
#[command(about = "Staked checkers match server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP match server
    Serve {
        /// Path to the TOML config file
        #[arg(short, long, default_value = "arena.toml")]
        config: PathBuf,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Credit a deposit to a player's wallet
    Deposit {
        /// Player receiving the deposit
        #[arg(long)]
        player: String,

        /// Amount to credit
        #[arg(long)]
        amount: u64,

        /// Path to the ledger database
        #[arg(long, default_value = "strictly_arena.db")]
        ledger: String,
    },

    /// Print a player's wallet balance
    Balance {
        /// Player to query
        #[arg(long)]
        player: String,

        /// Path to the ledger database
        #[arg(long, default_value = "strictly_arena.db")]
        ledger: String,
    },
}
