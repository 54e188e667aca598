//! First-class transition invariants for checkers.
//!
//! Invariants are logical properties of a single applied move, stated over
//! the state before and after it. They are checked in debug builds after
//! every [`apply_move`](crate::rules::apply_move) and can be tested
//! independently.

use crate::types::{GameState, Player};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn collect(violations: Vec<InvariantViolation>) -> Result<(), Vec<InvariantViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        collect(violations)
    }
}

impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }
        if !I4::holds(state) {
            violations.push(InvariantViolation::new(I4::description()));
        }
        collect(violations)
    }
}

/// A pair of states joined by one applied move.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    /// State before the move.
    pub before: &'a GameState,
    /// State after the move.
    pub after: &'a GameState,
}

impl<'a> Transition<'a> {
    /// Creates a transition.
    pub fn new(before: &'a GameState, after: &'a GameState) -> Self {
        Self { before, after }
    }

    fn progressed(&self) -> bool {
        [Player::Red, Player::White]
            .into_iter()
            .any(|p| self.after.board().count(p) < self.before.board().count(p))
            || kings(self.after) > kings(self.before)
    }
}

fn kings(state: &GameState) -> usize {
    state
        .board()
        .squares()
        .iter()
        .filter(|s| s.is_king())
        .count()
}

/// Invariant: the side to move flips on every move.
pub struct AlternatingTurnInvariant;

impl<'a> Invariant<Transition<'a>> for AlternatingTurnInvariant {
    fn holds(t: &Transition<'a>) -> bool {
        t.after.current_player() == t.before.current_player().opponent()
    }

    fn description() -> &'static str {
        "Side to move alternates"
    }
}

/// Invariant: the move number grows by exactly one.
pub struct MoveCounterInvariant;

impl<'a> Invariant<Transition<'a>> for MoveCounterInvariant {
    fn holds(t: &Transition<'a>) -> bool {
        t.after.move_number() == t.before.move_number() + 1
    }

    fn description() -> &'static str {
        "Move number increments by one"
    }
}

/// Invariant: the no-progress counter resets on a capture or crowning and
/// otherwise grows by one.
pub struct ProgressCounterInvariant;

impl<'a> Invariant<Transition<'a>> for ProgressCounterInvariant {
    fn holds(t: &Transition<'a>) -> bool {
        let expected = if t.progressed() {
            0
        } else {
            t.before.no_progress_count() + 1
        };
        t.after.no_progress_count() == expected
    }

    fn description() -> &'static str {
        "No-progress counter resets on capture or crowning, otherwise increments"
    }
}

/// Invariant: neither side gains pieces.
pub struct MaterialInvariant;

impl<'a> Invariant<Transition<'a>> for MaterialInvariant {
    fn holds(t: &Transition<'a>) -> bool {
        [Player::Red, Player::White]
            .into_iter()
            .all(|p| t.after.board().count(p) <= t.before.board().count(p))
    }

    fn description() -> &'static str {
        "No side gains material"
    }
}

/// All checkers transition invariants as a composable set.
pub type CheckersInvariants = (
    AlternatingTurnInvariant,
    MoveCounterInvariant,
    ProgressCounterInvariant,
    MaterialInvariant,
);

/// Panics if an applied move broke a transition invariant.
pub(crate) fn assert_transition(before: &GameState, after: &GameState) {
    if let Err(violations) = CheckersInvariants::check_all(&Transition::new(before, after)) {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        panic!("transition invariant violated: {descriptions}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Move;
    use crate::rules::apply_move;
    use crate::types::{Board, Square};

    #[test]
    fn test_invariant_set_holds_for_step() {
        let before = GameState::new();
        let after = apply_move(&before, &Move::step(21, 17)).expect("step");
        assert!(CheckersInvariants::check_all(&Transition::new(&before, &after)).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_for_capture() {
        let board = Board::empty()
            .with(22, Square::Man(Player::Red))
            .with(17, Square::Man(Player::White))
            .with(0, Square::Man(Player::White));
        let before = GameState::from_position(board, Player::Red);
        let after = apply_move(&before, &Move::new(vec![22, 13], vec![17])).expect("capture");
        assert!(CheckersInvariants::check_all(&Transition::new(&before, &after)).is_ok());
    }

    #[test]
    fn test_invariant_set_detects_frozen_state() {
        let state = GameState::new();
        let result = CheckersInvariants::check_all(&Transition::new(&state, &state));
        let violations = result.expect_err("identical states are not a move");
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn test_two_invariants_as_set() {
        let before = GameState::new();
        let after = apply_move(&before, &Move::step(20, 16)).expect("step");
        type TwoInvariants = (AlternatingTurnInvariant, MaterialInvariant);
        assert!(TwoInvariants::check_all(&Transition::new(&before, &after)).is_ok());
    }
}
