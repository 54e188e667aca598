//! Move generation: simple steps and multi-jump capture chains.
//!
//! Men step and capture only toward the opponent's home row; kings use all
//! four diagonals. A man that lands on its crowning row in the middle of a
//! chain is crowned on the spot and continues with king directions.

use crate::action::Move;
use crate::coords::coord_of;
use crate::types::{Board, Player, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

type Direction = (i8, i8);

const KING_DIRECTIONS: [Direction; 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Diagonals a piece may step or jump along. Men follow [`Player::forward`].
fn directions(player: Player, king: bool) -> Vec<Direction> {
    if king {
        return KING_DIRECTIONS.to_vec();
    }
    let forward = player.forward();
    vec![(forward, -1), (forward, 1)]
}

/// The moves a player may legally make this turn.
///
/// If any capture exists only the longest capture chains are legal and
/// simple steps are excluded; otherwise every simple step is legal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegalMoves {
    /// Capture chains of maximal length, sorted by path.
    Captures(Vec<Move>),
    /// Non-capturing steps, sorted by path.
    Normal(Vec<Move>),
}

impl LegalMoves {
    /// All legal moves.
    pub fn moves(&self) -> &[Move] {
        match self {
            LegalMoves::Captures(moves) | LegalMoves::Normal(moves) => moves,
        }
    }

    /// Returns true if a capture is mandatory this turn.
    pub fn is_capture(&self) -> bool {
        matches!(self, LegalMoves::Captures(_))
    }

    /// Returns true if the player has no legal move.
    pub fn is_empty(&self) -> bool {
        self.moves().is_empty()
    }

    /// Number of legal moves.
    pub fn len(&self) -> usize {
        self.moves().len()
    }

    /// Finds the legal move matching `mv` by path and capture set.
    pub fn find(&self, mv: &Move) -> Option<&Move> {
        self.moves().iter().find(|legal| legal.matches(mv))
    }

    /// Canonical forced capture: the lexicographically smallest path.
    pub fn suggestion(&self) -> Option<&Move> {
        match self {
            LegalMoves::Captures(moves) => moves.first(),
            LegalMoves::Normal(_) => None,
        }
    }
}

/// Enumerates every single-step, non-capturing move for `player`.
#[instrument(skip(board))]
pub fn normal_moves(board: &Board, player: Player) -> Vec<Move> {
    let mut moves = Vec::new();
    for origin in board.pieces_of(player) {
        let here = coord_of(origin);
        let king = board.squares()[origin].is_king();
        for (d_row, d_col) in directions(player, king) {
            if let Some(target) = here.offset(d_row, d_col).to_index()
                && board.squares()[target].is_empty()
            {
                moves.push(Move::step(origin, target));
            }
        }
    }
    moves.sort();
    moves
}

/// Enumerates every complete capture chain for `player`.
///
/// A chain is complete when no further jump is available from its last
/// square. Chains of every length are returned; [`legal_moves`] keeps only
/// the longest.
#[instrument(skip(board))]
pub fn capture_sequences(board: &Board, player: Player) -> Vec<Move> {
    let mut working = board.clone();
    let mut chains = Vec::new();
    for origin in board.pieces_of(player) {
        let king = board.squares()[origin].is_king();
        let mut path = vec![origin];
        let mut captured = Vec::new();
        extend_chain(
            &mut working,
            player,
            origin,
            king,
            &mut path,
            &mut captured,
            &mut chains,
        );
    }
    debug_assert_eq!(&working, board, "capture search must restore the board");
    chains.sort();
    debug!(count = chains.len(), "Capture chains found");
    chains
}

/// Depth-first jump search from `current`.
///
/// Each jump is simulated on `board` and undone after recursing, so the
/// caller sees the board unchanged.
fn extend_chain(
    board: &mut Board,
    player: Player,
    current: usize,
    king: bool,
    path: &mut Vec<usize>,
    captured: &mut Vec<usize>,
    chains: &mut Vec<Move>,
) {
    let here = coord_of(current);
    let mut extended = false;

    for (d_row, d_col) in directions(player, king) {
        let Some(over) = here.offset(d_row, d_col).to_index() else {
            continue;
        };
        if board.squares()[over].owner() != Some(player.opponent()) {
            continue;
        }
        let Some(landing) = here.offset(2 * d_row, 2 * d_col).to_index() else {
            continue;
        };
        if !board.squares()[landing].is_empty() {
            continue;
        }

        let crowned = king || coord_of(landing).row == player.king_row();
        let moving = board.squares()[current];
        let jumped = board.squares()[over];

        board.put(current, Square::Empty);
        board.put(over, Square::Empty);
        board.put(
            landing,
            if crowned {
                Square::King(player)
            } else {
                Square::Man(player)
            },
        );
        path.push(landing);
        captured.push(over);
        trace!(from = current, over, landing, crowned, "Simulating jump");

        extend_chain(board, player, landing, crowned, path, captured, chains);

        captured.pop();
        path.pop();
        board.put(landing, Square::Empty);
        board.put(over, jumped);
        board.put(current, moving);
        extended = true;
    }

    if !extended && !captured.is_empty() {
        chains.push(Move::new(path.clone(), captured.clone()));
    }
}

/// Computes the legal move set for `player`, applying the forced-capture rule.
#[instrument(skip(board))]
pub fn legal_moves(board: &Board, player: Player) -> LegalMoves {
    let mut captures = capture_sequences(board, player);
    if let Some(longest) = captures.iter().map(|m| m.captures.len()).max() {
        captures.retain(|m| m.captures.len() == longest);
        debug!(longest, count = captures.len(), "Capture is mandatory");
        return LegalMoves::Captures(captures);
    }
    LegalMoves::Normal(normal_moves(board, player))
}
