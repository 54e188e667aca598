//! SQLite persistence for the wallet ledger.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub use models::{EntryKind, LedgerEntry, NewLedgerEntry};
pub use repository::{DeductOutcome, LedgerRepository};
