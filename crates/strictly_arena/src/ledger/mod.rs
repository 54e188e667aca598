//! Ledger collaborator: the wallet that holds player balances.
//!
//! Matches escrow stakes and pay out pots through the [`Ledger`] trait. The
//! match core treats every call as an atomic remote operation and never
//! retries; durability belongs to the implementation.

mod memory;
mod sqlite;

pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;

use crate::db::DbError;
use serde::{Deserialize, Serialize};

/// Unique identifier for a player.
pub type PlayerId = String;

/// Amount of currency, in minor units.
pub type Amount = u64;

/// Wallet operations consumed by the match lifecycle.
#[async_trait::async_trait]
pub trait Ledger: Send + Sync + std::fmt::Debug {
    /// Removes `amount` from the player's balance.
    ///
    /// Fails with [`LedgerError::InsufficientFunds`] if the balance is lower.
    async fn deduct(&self, player: &str, amount: Amount) -> Result<(), LedgerError>;

    /// Credits a match winning to the player.
    async fn payout(&self, player: &str, amount: Amount) -> Result<(), LedgerError>;

    /// Credits an external deposit (or a refund) to the player.
    async fn deposit(&self, player: &str, amount: Amount) -> Result<(), LedgerError>;

    /// Returns the player's balance; unknown players hold zero.
    async fn balance(&self, player: &str) -> Result<Amount, LedgerError>;
}

/// Error returned by a ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum LedgerError {
    /// The balance is lower than the requested deduction.
    #[display("Insufficient funds: {player} holds {balance}, needs {requested}")]
    InsufficientFunds {
        /// Player whose balance was too low.
        player: PlayerId,
        /// Balance at the time of the request.
        balance: Amount,
        /// Amount requested.
        requested: Amount,
    },

    /// The backing store failed.
    #[display("Wallet error: {}", _0)]
    Storage(String),
}

impl std::error::Error for LedgerError {}

impl From<DbError> for LedgerError {
    fn from(err: DbError) -> Self {
        LedgerError::Storage(err.to_string())
    }
}
