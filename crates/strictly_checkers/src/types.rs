//! Core domain types for checkers.

use crate::coords::{Coord, PLAYABLE_SQUARES};
use serde::{Deserialize, Serialize};

/// Side in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Player {
    /// Starts on slots 20-31, moves first, promotes on row 0.
    Red,
    /// Starts on slots 0-11, promotes on row 7.
    White,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::White,
            Player::White => Player::Red,
        }
    }

    /// Row delta of a man's forward step.
    pub fn forward(self) -> i8 {
        match self {
            Player::Red => -1,
            Player::White => 1,
        }
    }

    /// Row on which this player's men are crowned.
    pub fn king_row(self) -> i8 {
        match self {
            Player::Red => 0,
            Player::White => 7,
        }
    }
}

/// Contents of one playable square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// No piece.
    Empty,
    /// An uncrowned piece.
    Man(Player),
    /// A crowned piece.
    King(Player),
}

impl Square {
    /// Returns the owner of the piece, if any.
    pub fn owner(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Man(p) | Square::King(p) => Some(p),
        }
    }

    /// Returns true for a crowned piece.
    pub fn is_king(self) -> bool {
        matches!(self, Square::King(_))
    }

    /// Returns true if the square holds no piece.
    pub fn is_empty(self) -> bool {
        self == Square::Empty
    }

    /// Returns the crowned version of this piece.
    pub fn crowned(self) -> Self {
        match self {
            Square::Man(p) => Square::King(p),
            other => other,
        }
    }

    fn symbol(self) -> char {
        match self {
            Square::Empty => '_',
            Square::Man(Player::Red) => 'r',
            Square::King(Player::Red) => 'R',
            Square::Man(Player::White) => 'w',
            Square::King(Player::White) => 'W',
        }
    }
}

/// The 32 playable squares of a checkers board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares by slot index (0-31).
    squares: [Square; PLAYABLE_SQUARES],
}

impl Board {
    /// Creates a board with no pieces.
    pub fn empty() -> Self {
        Self {
            squares: [Square::Empty; PLAYABLE_SQUARES],
        }
    }

    /// Creates the standard starting position.
    ///
    /// White men fill slots 0-11, Red men fill slots 20-31.
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for square in &mut board.squares[..12] {
            *square = Square::Man(Player::White);
        }
        for square in &mut board.squares[20..] {
            *square = Square::Man(Player::Red);
        }
        board
    }

    /// Gets the square at the given slot.
    pub fn get(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Returns the board with `square` placed on `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a playable slot.
    pub fn with(mut self, index: usize, square: Square) -> Self {
        self.squares[index] = square;
        self
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; PLAYABLE_SQUARES] {
        &self.squares
    }

    /// Number of pieces (men and kings) owned by `player`.
    pub fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|s| s.owner() == Some(player))
            .count()
    }

    /// Slots holding pieces owned by `player`, in ascending order.
    pub fn pieces_of(&self, player: Player) -> impl Iterator<Item = usize> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.owner() == Some(player))
            .map(|(i, _)| i)
    }

    pub(crate) fn put(&mut self, index: usize, square: Square) {
        self.squares[index] = square;
    }

    /// Formats the board as an 8x8 grid.
    ///
    /// Light squares print as `.`, empty dark squares as `_`, men as `r`/`w`
    /// and kings as `R`/`W`.
    pub fn display(&self) -> String {
        let mut rows = Vec::with_capacity(8);
        for row in 0..8 {
            let mut line = String::with_capacity(16);
            for col in 0..8 {
                let symbol = match Coord::new(row, col).to_index() {
                    Some(index) => self.squares[index].symbol(),
                    None => '.',
                };
                line.push(' ');
                line.push(symbol);
            }
            rows.push(line);
        }
        rows.join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

/// Termination status of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game continues.
    InProgress,
    /// Game ended with a winner.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// Returns true once the game has ended.
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Returns the winner, if any.
    pub fn winner(self) -> Option<Player> {
        match self {
            GameStatus::Won(player) => Some(player),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "In progress"),
            GameStatus::Won(player) => write!(f, "{player} wins"),
            GameStatus::Draw => write!(f, "Draw"),
        }
    }
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// The board.
    board: Board,
    /// Player to move.
    current_player: Player,
    /// Number of half-moves applied so far.
    move_number: u32,
    /// Half-moves since the last capture or promotion.
    no_progress_count: u32,
}

impl GameState {
    /// Creates a game in the standard starting position, Red to move.
    pub fn new() -> Self {
        Self::from_position(Board::initial(), Player::Red)
    }

    /// Creates a game from an arbitrary position with fresh counters.
    pub fn from_position(board: Board, current_player: Player) -> Self {
        Self {
            board,
            current_player,
            move_number: 0,
            no_progress_count: 0,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the number of half-moves played.
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    /// Returns the half-moves since the last capture or promotion.
    pub fn no_progress_count(&self) -> u32 {
        self.no_progress_count
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn advance(&mut self, progressed: bool) {
        self.no_progress_count = if progressed {
            0
        } else {
            self.no_progress_count + 1
        };
        self.current_player = self.current_player.opponent();
        self.move_number += 1;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_layout() {
        let board = Board::initial();
        for index in 0..12 {
            assert_eq!(board.get(index), Some(Square::Man(Player::White)));
        }
        for index in 12..20 {
            assert_eq!(board.get(index), Some(Square::Empty));
        }
        for index in 20..32 {
            assert_eq!(board.get(index), Some(Square::Man(Player::Red)));
        }
        assert_eq!(board.count(Player::Red), 12);
        assert_eq!(board.count(Player::White), 12);
    }

    #[test]
    fn test_red_moves_first() {
        let state = GameState::new();
        assert_eq!(state.current_player(), Player::Red);
        assert_eq!(state.move_number(), 0);
        assert_eq!(state.no_progress_count(), 0);
    }

    #[test]
    fn test_display_grid() {
        let text = Board::initial().display();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], " . w . w . w . w");
        assert_eq!(lines[3], " _ . _ . _ . _ .");
        assert_eq!(lines[7], " r . r . r . r .");
    }

    #[test]
    fn test_player_parse() {
        assert_eq!("red".parse::<Player>(), Ok(Player::Red));
        assert_eq!("White".parse::<Player>(), Ok(Player::White));
        assert_eq!(Player::Red.to_string(), "red");
    }
}
