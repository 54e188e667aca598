//! First-class move types for checkers.
//!
//! A move is a path of slot indices plus the slots it captures. Moves are
//! plain values: they can be generated, compared, serialized and suggested
//! without touching a game state.

use super::Player;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A checkers move.
///
/// `path` starts at the moving piece and ends on its final square; a simple
/// step has two entries, a capture chain one more per jump. `captures` lists
/// the jumped slots in jump order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    /// Slots visited, origin first.
    pub path: Vec<usize>,
    /// Slots whose pieces are removed.
    #[serde(default)]
    pub captures: Vec<usize>,
}

impl Move {
    /// Creates a move from a path and its captures.
    #[instrument]
    pub fn new(path: Vec<usize>, captures: Vec<usize>) -> Self {
        Self { path, captures }
    }

    /// Creates a non-capturing single step.
    pub fn step(from: usize, to: usize) -> Self {
        Self {
            path: vec![from, to],
            captures: Vec::new(),
        }
    }

    /// Origin slot, if the path is non-empty.
    pub fn origin(&self) -> Option<usize> {
        self.path.first().copied()
    }

    /// Final slot, if the path is non-empty.
    pub fn destination(&self) -> Option<usize> {
        self.path.last().copied()
    }

    /// Returns true if this move removes at least one piece.
    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }

    /// Compares two moves by exact path and by capture set.
    ///
    /// Captures are compared irrespective of order.
    pub fn matches(&self, other: &Move) -> bool {
        if self.path != other.path || self.captures.len() != other.captures.len() {
            return false;
        }
        let mut mine = self.captures.clone();
        let mut theirs = other.captures.clone();
        mine.sort_unstable();
        theirs.sort_unstable();
        mine == theirs
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sep = if self.is_capture() { "x" } else { "-" };
        let path = self
            .path
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(sep);
        write!(f, "{path}")
    }
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// It's not this player's turn.
    #[display("Not your turn: {} to move", _0)]
    NotYourTurn(Player),

    /// The path is too short or leaves the board.
    #[display("Invalid move sequence: {}", _0)]
    InvalidMoveSequence(String),

    /// A capture was available and the submitted move is not one of the longest.
    #[display("A capture is mandatory: play {}", suggestion)]
    MandatoryCapture {
        /// Canonical forced capture.
        suggestion: Move,
    },

    /// The move is not in the legal move set.
    #[display("Illegal move: {}", _0)]
    IllegalMove(Move),
}

impl std::error::Error for MoveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_ignores_capture_order() {
        let a = Move::new(vec![22, 15, 6], vec![18, 10]);
        let b = Move::new(vec![22, 15, 6], vec![10, 18]);
        assert!(a.matches(&b));
    }

    #[test]
    fn test_matches_requires_exact_path() {
        let a = Move::new(vec![22, 15, 6], vec![18, 10]);
        let b = Move::new(vec![22, 13, 6], vec![18, 10]);
        assert!(!a.matches(&b));
    }

    #[test]
    fn test_display() {
        assert_eq!(Move::step(20, 16).to_string(), "20-16");
        assert_eq!(Move::new(vec![22, 15], vec![18]).to_string(), "22x15");
    }

    #[test]
    fn test_missing_captures_deserialize_empty() {
        let mv: Move = serde_json::from_str(r#"{"path":[20,16]}"#).expect("valid json");
        assert_eq!(mv, Move::step(20, 16));
    }
}
