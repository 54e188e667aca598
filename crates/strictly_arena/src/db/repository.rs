//! Database repository for player balances and the ledger journal.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, EntryKind, LedgerEntry, NewLedgerEntry, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Result of a conditional deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeductOutcome {
    /// The balance covered the amount and was reduced.
    Deducted,
    /// The balance was too low; nothing changed.
    Insufficient {
        /// Balance at the time of the attempt.
        balance: i64,
    },
}

/// Synchronous repository over a SQLite ledger database.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db_path: String,
}

impl LedgerRepository {
    /// Opens the database at `db_path`, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening ledger database");
        let repo = Self { db_path };
        let mut conn = repo.connection()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("cannot migrate ledger schema: {}", e)))?;
        Ok(repo)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("cannot open ledger '{}': {}", self.db_path, e)))?;
        diesel::sql_query("PRAGMA busy_timeout = 5000").execute(&mut conn)?;
        Ok(conn)
    }

    /// Returns the balance of `player`, zero if the player has no row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn balance(&self, player: &str) -> Result<i64, DbError> {
        let mut conn = self.connection()?;
        let balance = schema::balances::table
            .find(player)
            .select(schema::balances::balance)
            .first::<i64>(&mut conn)
            .optional()?;
        Ok(balance.unwrap_or(0))
    }

    /// Deducts `amount` if and only if the balance covers it.
    ///
    /// The check and the update are a single conditional statement inside an
    /// immediate transaction, so two concurrent deductions cannot both pass.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn deduct(&self, player: &str, amount: i64) -> Result<DeductOutcome, DbError> {
        use schema::balances::dsl;

        if amount == 0 {
            return Ok(DeductOutcome::Deducted);
        }
        let mut conn = self.connection()?;
        conn.immediate_transaction(|conn| {
            let updated = diesel::update(
                dsl::balances
                    .filter(dsl::player_id.eq(player))
                    .filter(dsl::balance.ge(amount)),
            )
            .set(dsl::balance.eq(dsl::balance - amount))
            .execute(conn)?;

            if updated == 0 {
                let balance = dsl::balances
                    .find(player)
                    .select(dsl::balance)
                    .first::<i64>(conn)
                    .optional()?
                    .unwrap_or(0);
                warn!(balance, "Insufficient funds");
                return Ok(DeductOutcome::Insufficient { balance });
            }

            record(conn, player, EntryKind::Deduct, amount)?;
            debug!("Deducted");
            Ok(DeductOutcome::Deducted)
        })
    }

    /// Credits `amount` to `player`, creating the balance row if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn credit(&self, player: &str, amount: i64, kind: EntryKind) -> Result<(), DbError> {
        use schema::balances::dsl;

        let mut conn = self.connection()?;
        conn.immediate_transaction(|conn| {
            diesel::insert_into(dsl::balances)
                .values((dsl::player_id.eq(player), dsl::balance.eq(amount)))
                .on_conflict(dsl::player_id)
                .do_update()
                .set(dsl::balance.eq(dsl::balance + amount))
                .execute(conn)?;
            record(conn, player, kind, amount)?;
            debug!(%kind, "Credited");
            Ok(())
        })
    }

    /// Returns the journal entries of `player`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn entries(&self, player: &str) -> Result<Vec<LedgerEntry>, DbError> {
        use schema::ledger_entries::dsl;

        let mut conn = self.connection()?;
        let entries = dsl::ledger_entries
            .filter(dsl::player_id.eq(player))
            .order(dsl::id.asc())
            .select(LedgerEntry::as_select())
            .load(&mut conn)?;
        debug!(count = entries.len(), "Loaded ledger entries");
        Ok(entries)
    }
}

fn record(
    conn: &mut SqliteConnection,
    player: &str,
    kind: EntryKind,
    amount: i64,
) -> Result<(), DbError> {
    diesel::insert_into(schema::ledger_entries::table)
        .values(&NewLedgerEntry::new(player.to_string(), kind.to_string(), amount))
        .execute(conn)?;
    Ok(())
}
