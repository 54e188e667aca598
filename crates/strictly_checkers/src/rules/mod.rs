//! Game rules for checkers.
//!
//! Pure functions over [`GameState`](crate::GameState): validating a
//! submitted move against the forced-capture rule, applying a legal move,
//! and deciding whether a position is terminal.

pub mod apply;
pub mod outcome;
pub mod validate;

pub use apply::apply_move;
pub use outcome::{NO_PROGRESS_LIMIT, evaluate};
pub use validate::validate_and_apply;
