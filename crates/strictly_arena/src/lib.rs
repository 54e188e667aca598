//! Strictly Arena - staked checkers matches
//!
//! Seats two players, escrows their stakes through a wallet ledger, drives
//! the game with the `strictly_checkers` rule engine and pays out the pot
//! when the game ends.
//!
//! # Architecture
//!
//! - **Matches**: lifecycle state machine (`pending → active → completed`)
//! - **Manager**: registry that serializes transitions per match
//! - **Ledger**: wallet trait with in-memory and SQLite implementations
//! - **Server**: JSON-over-HTTP adapter (axum)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use strictly_arena::{MatchManager, MatchStatus, MemoryLedger};
//! use strictly_checkers::Player;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), strictly_arena::MatchError> {
//! let ledger = MemoryLedger::with_balances([("alice", 100), ("bob", 100)]);
//! let manager = MatchManager::new(Arc::new(ledger));
//!
//! manager.create_match("m1".to_string(), 20).await?;
//! manager.join("m1", Player::Red, "alice").await?;
//! let m = manager.join("m1", Player::White, "bob").await?;
//! assert_eq!(*m.status(), MatchStatus::Active);
//! assert_eq!(*m.pot(), 40);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod error;
mod ledger;
mod manager;
mod matches;
mod server;

// Crate-level exports - Configuration
pub use config::{ArenaConfig, ConfigError};

// Crate-level exports - Storage
pub use db::{DbError, DeductOutcome, EntryKind, LedgerEntry, LedgerRepository};

// Crate-level exports - Errors
pub use error::MatchError;

// Crate-level exports - Ledger
pub use ledger::{Amount, Ledger, LedgerError, MemoryLedger, PlayerId, SqliteLedger};

// Crate-level exports - Match lifecycle
pub use manager::MatchManager;
pub use matches::{Match, MatchEnd, MatchId, MatchStatus, MoveReport, Seats};

// Crate-level exports - HTTP adapter
pub use server::{
    ApiError, AppState, BalanceResponse, CreateMatchRequest, ErrorBody, JoinRequest, MoveRequest,
    router, serve,
};
