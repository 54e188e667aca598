//! Applying an already-validated move.

use crate::action::{Move, MoveError};
use crate::coords::{PLAYABLE_SQUARES, coord_of};
use crate::invariants::assert_transition;
use crate::types::{GameState, Square};
use tracing::{instrument, trace};

/// Applies a legal move and returns the resulting state.
///
/// The input state is left untouched. The moving piece is crowned when it is
/// a man and its path reaches its crowning row, either on the final square or
/// mid-chain. The no-progress counter resets on a capture or a crowning and
/// otherwise grows by one.
///
/// # Errors
///
/// Returns [`MoveError::InvalidMoveSequence`] if the path has fewer than two
/// slots or names a slot past 31.
#[instrument(skip_all, fields(mv = %mv))]
pub fn apply_move(state: &GameState, mv: &Move) -> Result<GameState, MoveError> {
    let (from, to) = match (mv.origin(), mv.destination()) {
        (Some(from), Some(to)) if mv.path.len() >= 2 => (from, to),
        _ => {
            return Err(MoveError::InvalidMoveSequence(
                "path must contain at least two slots".to_string(),
            ));
        }
    };
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

    let piece = state.board().squares()[from];
    let Some(owner) = piece.owner() else {
        return Err(MoveError::InvalidMoveSequence(format!(
            "no piece on slot {from}"
        )));
    };

    let crowned = !piece.is_king()
        && mv.path[1..]
            .iter()
            .any(|&slot| coord_of(slot).row == owner.king_row());
    let progressed = mv.is_capture() || crowned;

    let mut next = state.clone();
    let board = next.board_mut();
    board.put(from, Square::Empty);
    for &captured in &mv.captures {
        board.put(captured, Square::Empty);
    }
    board.put(to, if crowned { piece.crowned() } else { piece });
    next.advance(progressed);

    trace!(from, to, crowned, progressed, "Move applied");

    if cfg!(debug_assertions) {
        assert_transition(state, &next);
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Board, Player};

    #[test]
    fn test_simple_step() {
        let state = GameState::new();
        let next = apply_move(&state, &Move::step(20, 16)).expect("legal step");

        assert_eq!(next.board().get(20), Some(Square::Empty));
        assert_eq!(next.board().get(16), Some(Square::Man(Player::Red)));
        assert_eq!(next.current_player(), Player::White);
        assert_eq!(next.move_number(), 1);
        assert_eq!(next.no_progress_count(), 1);
        // Copy-on-write: the input state is unchanged.
        assert_eq!(state, GameState::new());
    }

    #[test]
    fn test_capture_resets_progress_counter() {
        let board = Board::empty()
            .with(22, Square::Man(Player::Red))
            .with(17, Square::Man(Player::White))
            .with(0, Square::Man(Player::White));
        let state = GameState::from_position(board, Player::Red);
        let quiet = apply_move(&state, &Move::step(22, 18)).expect("step");
        assert_eq!(quiet.no_progress_count(), 1);

        let next = apply_move(&state, &Move::new(vec![22, 13], vec![17])).expect("capture");
        assert_eq!(next.no_progress_count(), 0);
        assert_eq!(next.board().get(17), Some(Square::Empty));
        assert_eq!(next.board().count(Player::White), 1);
    }

    #[test]
    fn test_promotion_on_final_square() {
        let board = Board::empty()
            .with(5, Square::Man(Player::Red))
            .with(31, Square::Man(Player::White));
        let state = GameState::from_position(board, Player::Red);
        let next = apply_move(&state, &Move::step(5, 0)).expect("step");
        assert_eq!(next.board().get(0), Some(Square::King(Player::Red)));
        assert_eq!(next.no_progress_count(), 0);
    }

    #[test]
    fn test_king_is_not_recrowned() {
        let board = Board::empty()
            .with(5, Square::King(Player::Red))
            .with(31, Square::Man(Player::White));
        let state = GameState::from_position(board, Player::Red);
        let next = apply_move(&state, &Move::step(5, 0)).expect("step");
        assert_eq!(next.board().get(0), Some(Square::King(Player::Red)));
        assert_eq!(next.no_progress_count(), 1);
    }

    #[test]
    fn test_mid_chain_crowning_persists() {
        let board = Board::empty()
            .with(9, Square::Man(Player::Red))
            .with(6, Square::Man(Player::White))
            .with(7, Square::Man(Player::White))
            .with(31, Square::Man(Player::White));
        let state = GameState::from_position(board, Player::Red);
        let next = apply_move(&state, &Move::new(vec![9, 2, 11], vec![6, 7])).expect("chain");
        assert_eq!(next.board().get(11), Some(Square::King(Player::Red)));
    }

    #[test]
    fn test_short_path_rejected() {
        let state = GameState::new();
        let result = apply_move(&state, &Move::new(vec![20], vec![]));
        assert!(matches!(result, Err(MoveError::InvalidMoveSequence(_))));
    }

    #[test]
    fn test_off_board_slot_rejected() {
        let state = GameState::new();
        let result = apply_move(&state, &Move::new(vec![20, 32], vec![]));
        assert_eq!(
            result,
            Err(MoveError::InvalidMoveSequence(
                "slot 32 is off the board".to_string()
            ))
        );

        let result = apply_move(&state, &Move::new(vec![22, 13], vec![32]));
        assert!(matches!(result, Err(MoveError::InvalidMoveSequence(_))));
    }
}
