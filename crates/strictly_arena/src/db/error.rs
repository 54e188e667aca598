//! Database error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Failure of the ledger database, tagged with the code location that
/// raised it.
#[derive(Debug, Clone, Display, Error)]
#[display("Ledger storage error: {} ({}:{})", message, file, line)]
pub struct DbError {
    /// What the ledger store could not do.
    pub message: String,
    /// Line that raised the error.
    pub line: u32,
    /// Source file that raised the error.
    pub file: &'static str,
}

impl DbError {
    /// Creates an error located at the caller.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("ledger query failed: {}", err))
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("ledger database unreachable: {}", err))
    }
}
