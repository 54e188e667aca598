//! Match lifecycle errors.

use crate::ledger::{LedgerError, PlayerId};
use crate::matches::{MatchId, MatchStatus};
use serde::Serialize;
use strictly_checkers::{Move, MoveError, Player};

/// Error returned by a match operation.
///
/// Every variant is a recoverable rejection: the match is left exactly as it
/// was, except for the seat rollback that follows a failed escrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum MatchError {
    /// No match has this id.
    #[display("Match not found: {}", _0)]
    MatchNotFound(MatchId),

    /// A match with this id already exists.
    #[display("Match already exists: {}", _0)]
    MatchExists(MatchId),

    /// The stake cannot be doubled into a pot.
    #[display("Invalid stake: {}", _0)]
    InvalidStake(u64),

    /// The seat is held by another player.
    #[display("Seat {} is taken", _0)]
    SeatTaken(Player),

    /// Escrowing the stakes failed; both seats were cleared.
    #[display("Could not join: {}", _0)]
    Escrow(LedgerError),

    /// The submitting side is not on move.
    #[display("Not your turn: {} to move", _0)]
    NotYourTurn(Player),

    /// The player is not seated on the claimed side.
    #[display("Authentication failed: {player_id} is not seated as {side}")]
    AuthenticationMismatch {
        /// Identity that submitted the move.
        player_id: PlayerId,
        /// Side the identity claimed.
        side: Player,
    },

    /// The submitted path is malformed.
    #[display("Invalid move sequence: {}", _0)]
    InvalidMoveSequence(String),

    /// A capture was mandatory; carries the forced move.
    #[display("Illegal move: a capture is mandatory, play {suggestion}")]
    MandatoryCaptureViolation {
        /// Canonical forced capture.
        suggestion: Move,
    },

    /// The move is not legal in the current position.
    #[display("Illegal move: {}", _0)]
    IllegalMove(Move),

    /// Moves are only accepted while the match is active.
    #[display("Match is not active (status: {})", _0)]
    InactiveMatch(MatchStatus),

    /// The task running a transition panicked.
    #[display("Match transition failed: {}", _0)]
    Internal(String),
}

impl std::error::Error for MatchError {}

impl From<MoveError> for MatchError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::NotYourTurn(player) => MatchError::NotYourTurn(player),
            MoveError::InvalidMoveSequence(reason) => MatchError::InvalidMoveSequence(reason),
            MoveError::MandatoryCapture { suggestion } => {
                MatchError::MandatoryCaptureViolation { suggestion }
            }
            MoveError::IllegalMove(mv) => MatchError::IllegalMove(mv),
        }
    }
}

impl MatchError {
    /// The forced move to show the submitting player, if any.
    pub fn suggestion(&self) -> Option<&Move> {
        match self {
            MatchError::MandatoryCaptureViolation { suggestion } => Some(suggestion),
            _ => None,
        }
    }
}
