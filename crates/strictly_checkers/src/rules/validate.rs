//! Move validation with the forced-capture rule.

use super::apply::apply_move;
use crate::action::{Move, MoveError};
use crate::coords::PLAYABLE_SQUARES;
use crate::movegen::legal_moves;
use crate::types::{GameState, Player};
use tracing::{debug, instrument, warn};

/// Validates `mv` for `player` and returns the resulting state.
///
/// The checks run in order: turn, path shape, forced capture, legality.
/// On any rejection the state is untouched.
///
/// # Errors
///
/// - [`MoveError::NotYourTurn`] if `player` is not on move.
/// - [`MoveError::InvalidMoveSequence`] for a path shorter than two slots or
///   a slot off the board.
/// - [`MoveError::MandatoryCapture`] if a capture exists and `mv` is not one
///   of the longest captures; carries the canonical suggestion.
/// - [`MoveError::IllegalMove`] if `mv` is otherwise not legal.
#[instrument(skip(state), fields(to_move = %state.current_player()))]
pub fn validate_and_apply(
    state: &GameState,
    mv: &Move,
    player: Player,
) -> Result<GameState, MoveError> {
    if state.current_player() != player {
        warn!("Player tried to move out of turn");
        return Err(MoveError::NotYourTurn(state.current_player()));
    }

    if mv.path.len() < 2 {
        return Err(MoveError::InvalidMoveSequence(
            "path must contain at least two slots".to_string(),
        ));
    }
    if let Some(bad) = mv
        .path
        .iter()
        .chain(&mv.captures)
        .find(|&&i| i >= PLAYABLE_SQUARES)
    {
        return Err(MoveError::InvalidMoveSequence(format!(
            "slot {bad} is off the board"
        )));
    }

    let legal = legal_moves(state.board(), player);
    debug!(
        count = legal.len(),
        capture = legal.is_capture(),
        "Generated legal moves"
    );

    let Some(found) = legal.find(mv) else {
        if let Some(suggestion) = legal.suggestion() {
            warn!(suggestion = %suggestion, "Capture is mandatory");
            return Err(MoveError::MandatoryCapture {
                suggestion: suggestion.clone(),
            });
        }
        warn!("Move not in legal set");
        return Err(MoveError::IllegalMove(mv.clone()));
    };

    apply_move(state, found)
}
