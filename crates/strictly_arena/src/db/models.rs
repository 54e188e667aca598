//! Database models for the ledger journal.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::{DbError, schema};

/// Kind of balance movement recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    /// Stake escrowed for a match.
    Deduct,
    /// Pot (or half-pot) credited after a match.
    Payout,
    /// External deposit or escrow refund.
    Deposit,
}

/// Journal row recording one balance movement.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::ledger_entries)]
pub struct LedgerEntry {
    id: i32,
    player_id: String,
    kind: String,
    amount: i64,
    created_at: NaiveDateTime,
}

impl LedgerEntry {
    /// Parses the stored kind string into an [`EntryKind`].
    #[instrument(skip(self), fields(kind = %self.kind))]
    pub fn parse_kind(&self) -> Result<EntryKind, DbError> {
        self.kind
            .parse()
            .map_err(|_| DbError::new(format!("unknown ledger entry kind '{}'", self.kind)))
    }
}

/// Insertable journal row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::ledger_entries)]
pub struct NewLedgerEntry {
    player_id: String,
    kind: String,
    amount: i64,
}
