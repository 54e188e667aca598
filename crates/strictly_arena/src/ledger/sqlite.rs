//! SQLite-backed ledger.

use super::{Amount, Ledger, LedgerError};
use crate::db::{DbError, DeductOutcome, EntryKind, LedgerEntry, LedgerRepository};
use tracing::{info, instrument};

/// Ledger persisted in a SQLite database.
///
/// Diesel is synchronous, so every call runs on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    repository: LedgerRepository,
}

impl SqliteLedger {
    /// Opens (and migrates) the ledger database at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument]
    pub fn open(db_path: &str) -> Result<Self, DbError> {
        let repository = LedgerRepository::open(db_path.to_string())?;
        info!("SQLite ledger ready");
        Ok(Self { repository })
    }

    /// Returns the journal entries of `player`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] if the query fails.
    pub async fn entries(&self, player: &str) -> Result<Vec<LedgerEntry>, LedgerError> {
        let player = player.to_string();
        self.blocking(move |repo| repo.entries(&player)).await
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, LedgerError>
    where
        T: Send + 'static,
        F: FnOnce(&LedgerRepository) -> Result<T, DbError> + Send + 'static,
    {
        let repository = self.repository.clone();
        tokio::task::spawn_blocking(move || f(&repository))
            .await
            .map_err(|e| LedgerError::Storage(format!("ledger task failed: {}", e)))?
            .map_err(LedgerError::from)
    }

    async fn credit(&self, player: &str, amount: Amount, kind: EntryKind) -> Result<(), LedgerError> {
        let amount = to_db(amount)?;
        let player = player.to_string();
        self.blocking(move |repo| repo.credit(&player, amount, kind)).await
    }
}

fn to_db(amount: Amount) -> Result<i64, LedgerError> {
    i64::try_from(amount)
        .map_err(|_| LedgerError::Storage(format!("amount {} exceeds storage range", amount)))
}

fn from_db(balance: i64) -> Result<Amount, LedgerError> {
    Amount::try_from(balance)
        .map_err(|_| LedgerError::Storage(format!("negative stored balance {}", balance)))
}

#[async_trait::async_trait]
impl Ledger for SqliteLedger {
    #[instrument(skip(self))]
    async fn deduct(&self, player: &str, amount: Amount) -> Result<(), LedgerError> {
        let requested = to_db(amount)?;
        let owned = player.to_string();
        let outcome = self
            .blocking(move |repo| repo.deduct(&owned, requested))
            .await?;
        match outcome {
            DeductOutcome::Deducted => Ok(()),
            DeductOutcome::Insufficient { balance } => Err(LedgerError::InsufficientFunds {
                player: player.to_string(),
                balance: from_db(balance)?,
                requested: amount,
            }),
        }
    }

    #[instrument(skip(self))]
    async fn payout(&self, player: &str, amount: Amount) -> Result<(), LedgerError> {
        self.credit(player, amount, EntryKind::Payout).await
    }

    #[instrument(skip(self))]
    async fn deposit(&self, player: &str, amount: Amount) -> Result<(), LedgerError> {
        self.credit(player, amount, EntryKind::Deposit).await
    }

    #[instrument(skip(self))]
    async fn balance(&self, player: &str) -> Result<Amount, LedgerError> {
        let player = player.to_string();
        let balance = self.blocking(move |repo| repo.balance(&player)).await?;
        from_db(balance)
    }
}
