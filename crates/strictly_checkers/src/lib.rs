//! Strictly Checkers - authoritative rule engine for 8x8 checkers.
//!
//! The engine is pure and synchronous. It never mutates a state in place:
//! every accepted move produces a fresh [`GameState`].
//!
//! # Architecture
//!
//! - **Coordinates**: mapping between the 32 playable slots and (row, column)
//! - **Movegen**: simple moves and multi-jump capture chains
//! - **Rules**: forced-capture validation, move application, termination
//! - **Invariants**: transition properties checked in debug builds
//!
//! # Example
//!
//! ```
//! use strictly_checkers::{GameState, Move, Player, rules};
//!
//! let state = GameState::new();
//! let next = rules::validate_and_apply(&state, &Move::step(20, 16), Player::Red)?;
//! assert_eq!(next.current_player(), Player::White);
//! # Ok::<(), strictly_checkers::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod coords;
mod invariants;
mod movegen;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use coords::{Coord, PLAYABLE_SQUARES};
pub use invariants::{
    AlternatingTurnInvariant, CheckersInvariants, Invariant, InvariantSet, InvariantViolation,
    MaterialInvariant, MoveCounterInvariant, ProgressCounterInvariant, Transition,
};
pub use movegen::{LegalMoves, capture_sequences, legal_moves, normal_moves};
pub use rules::NO_PROGRESS_LIMIT;
pub use types::{Board, GameState, GameStatus, Player, Square};
