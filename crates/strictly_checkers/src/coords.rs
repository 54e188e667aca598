//! Mapping between playable slot indices and board coordinates.
//!
//! Slots are numbered 0-31 row by row from the top of the board. Even rows
//! start their dark squares on column 1, odd rows on column 0. Every other
//! module goes through this mapping, never through its own arithmetic.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of playable (dark) squares on the board.
pub const PLAYABLE_SQUARES: usize = 32;

/// A (row, column) coordinate on the 8x8 grid.
///
/// Coordinates may lie off the board; [`Coord::to_index`] filters those out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row, 0 at the top.
    pub row: i8,
    /// Column, 0 at the left.
    pub col: i8,
}

impl Coord {
    /// Creates a coordinate.
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Returns the coordinate of a slot index, or `None` past slot 31.
    #[instrument(level = "trace")]
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= PLAYABLE_SQUARES {
            return None;
        }
        let row = (index / 4) as i8;
        let pos_in_row = (index % 4) as i8;
        let col = if row % 2 == 0 {
            1 + 2 * pos_in_row
        } else {
            2 * pos_in_row
        };
        Some(Self { row, col })
    }

    /// Returns the slot index, or `None` for light or off-board squares.
    #[instrument(level = "trace")]
    pub fn to_index(self) -> Option<usize> {
        if !(0..8).contains(&self.row) || !(0..8).contains(&self.col) {
            return None;
        }
        if (self.row + self.col) % 2 == 0 {
            return None;
        }
        Some(self.row as usize * 4 + self.col as usize / 2)
    }

    /// Returns the coordinate shifted by the given deltas.
    pub fn offset(self, d_row: i8, d_col: i8) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

/// Returns the coordinate of a generated slot index.
///
/// # Panics
///
/// Panics on an index of 32 or more, which only a generator defect produces.
pub(crate) fn coord_of(index: usize) -> Coord {
    match Coord::from_index(index) {
        Some(coord) => coord,
        None => panic!("slot index {index} out of range"),
    }
}
