//! In-process ledger for tests and single-node play.

use super::{Amount, Ledger, LedgerError, PlayerId};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Ledger that keeps balances in memory.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    balances: Mutex<HashMap<PlayerId, Amount>>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory ledger");
        Self::default()
    }

    /// Creates a ledger with opening balances.
    pub fn with_balances<I, P>(balances: I) -> Self
    where
        I: IntoIterator<Item = (P, Amount)>,
        P: Into<PlayerId>,
    {
        let balances = balances
            .into_iter()
            .map(|(player, amount)| (player.into(), amount))
            .collect();
        Self {
            balances: Mutex::new(balances),
        }
    }

    async fn credit(&self, player: &str, amount: Amount) -> Result<(), LedgerError> {
        let mut balances = self.balances.lock().await;
        let balance = balances.entry(player.to_string()).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Storage(format!("balance overflow for {player}")))?;
        debug!(player, amount, balance = *balance, "Credited");
        Ok(())
    }
}

#[async_trait::async_trait]
impl Ledger for MemoryLedger {
    #[instrument(skip(self))]
    async fn deduct(&self, player: &str, amount: Amount) -> Result<(), LedgerError> {
        let mut balances = self.balances.lock().await;
        let balance = balances.get(player).copied().unwrap_or(0);
        if balance < amount {
            warn!(balance, "Insufficient funds");
            return Err(LedgerError::InsufficientFunds {
                player: player.to_string(),
                balance,
                requested: amount,
            });
        }
        balances.insert(player.to_string(), balance - amount);
        debug!(balance = balance - amount, "Deducted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn payout(&self, player: &str, amount: Amount) -> Result<(), LedgerError> {
        self.credit(player, amount).await
    }

    #[instrument(skip(self))]
    async fn deposit(&self, player: &str, amount: Amount) -> Result<(), LedgerError> {
        self.credit(player, amount).await
    }

    #[instrument(skip(self))]
    async fn balance(&self, player: &str) -> Result<Amount, LedgerError> {
        Ok(self.balances.lock().await.get(player).copied().unwrap_or(0))
    }
}
