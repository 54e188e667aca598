//! Termination detection: elimination, blockade and the no-progress draw.

use crate::movegen::legal_moves;
use crate::types::{GameState, GameStatus, Player};
use tracing::{debug, instrument};

/// Half-moves without a capture or crowning after which the game is drawn.
pub const NO_PROGRESS_LIMIT: u32 = 100;

/// Decides whether `state` is terminal.
///
/// Checked in order:
/// 1. A side with no pieces loses.
/// 2. A side to move with no legal move loses.
/// 3. [`NO_PROGRESS_LIMIT`] quiet half-moves is a draw.
#[instrument(skip(state), fields(move_number = state.move_number()))]
pub fn evaluate(state: &GameState) -> GameStatus {
    let board = state.board();
    for player in [Player::Red, Player::White] {
        if board.count(player) == 0 {
            debug!(%player, "Side eliminated");
            return GameStatus::Won(player.opponent());
        }
    }

    let to_move = state.current_player();
    if legal_moves(board, to_move).is_empty() {
        debug!(%to_move, "Side to move is blocked");
        return GameStatus::Won(to_move.opponent());
    }

    if state.no_progress_count() >= NO_PROGRESS_LIMIT {
        debug!(count = state.no_progress_count(), "No-progress draw");
        return GameStatus::Draw;
    }

    GameStatus::InProgress
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Board, Square};

    #[test]
    fn test_opening_in_progress() {
        assert_eq!(evaluate(&GameState::new()), GameStatus::InProgress);
    }

    #[test]
    fn test_elimination() {
        let board = Board::empty().with(17, Square::King(Player::White));
        let state = GameState::from_position(board, Player::Red);
        assert_eq!(evaluate(&state), GameStatus::Won(Player::White));
    }

    #[test]
    fn test_blockade_loses() {
        let board = Board::empty()
            .with(4, Square::Man(Player::Red))
            .with(0, Square::Man(Player::White));
        let state = GameState::from_position(board, Player::Red);
        assert_eq!(evaluate(&state), GameStatus::Won(Player::White));
    }
}
