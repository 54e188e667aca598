//! Strictly Arena - CLI
//!
//! Serves staked checkers matches over HTTP and manages wallet balances.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use strictly_arena::{
    ArenaConfig, BalanceResponse, Ledger, MatchManager, MemoryLedger, SqliteLedger,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::Deposit {
            player,
            amount,
            ledger,
        } => run_deposit(ledger, player, amount).await,
        Command::Balance { player, ledger } => run_balance(ledger, player).await,
    }
}

/// Run the HTTP match server
#[instrument]
async fn run_server(
    config: std::path::PathBuf,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let config = ArenaConfig::from_file(&config)?.with_overrides(host, port);

    let ledger: Arc<dyn Ledger> = match config.ledger_path() {
        Some(path) => Arc::new(SqliteLedger::open(path)?),
        None => {
            info!("No ledger_path configured, balances will not persist");
            Arc::new(MemoryLedger::new())
        }
    };

    let manager = MatchManager::new(ledger);
    info!(address = %config.bind_address(), "Starting Strictly Arena");
    strictly_arena::serve(&config.bind_address(), manager, *config.default_stake()).await?;
    Ok(())
}

/// Credit a deposit and print the new balance
#[instrument]
async fn run_deposit(ledger_path: String, player: String, amount: u64) -> Result<()> {
    let ledger = SqliteLedger::open(&ledger_path)?;
    ledger.deposit(&player, amount).await?;
    info!(player, amount, "Deposit recorded");
    print_balance(&ledger, player).await
}

/// Print a player's balance
#[instrument]
async fn run_balance(ledger_path: String, player: String) -> Result<()> {
    let ledger = SqliteLedger::open(&ledger_path)?;
    print_balance(&ledger, player).await
}

async fn print_balance(ledger: &SqliteLedger, player_id: String) -> Result<()> {
    let balance = ledger.balance(&player_id).await?;
    let response = BalanceResponse { player_id, balance };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
