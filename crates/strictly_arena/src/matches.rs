//! Match lifecycle: seating, stake escrow, moves and payout.
//!
//! A [`Match`] moves through `pending → active → completed` and never back.
//! Escrow happens once, when the second seat fills; payout happens once, on
//! the move that ends the game. All wallet traffic goes through a
//! [`Ledger`].

use crate::error::MatchError;
use crate::ledger::{Amount, Ledger, LedgerError, PlayerId};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strictly_checkers::{GameState, GameStatus, Move, Player, rules};
use tracing::{error, info, instrument, warn};

/// Unique identifier for a match.
pub type MatchId = String;

/// Lifecycle status of a match.
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
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchStatus {
    /// Waiting for both seats to fill and stakes to clear.
    Pending,
    /// Stakes escrowed; moves are accepted.
    Active,
    /// Game over and settled.
    Completed,
}

/// Identities seated on each side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seats {
    /// Player on the red side.
    pub red: Option<PlayerId>,
    /// Player on the white side.
    pub white: Option<PlayerId>,
}

impl Seats {
    /// Returns the identity on `seat`.
    pub fn get(&self, seat: Player) -> Option<&PlayerId> {
        match seat {
            Player::Red => self.red.as_ref(),
            Player::White => self.white.as_ref(),
        }
    }

    fn slot(&mut self, seat: Player) -> &mut Option<PlayerId> {
        match seat {
            Player::Red => &mut self.red,
            Player::White => &mut self.white,
        }
    }

    /// Returns both identities once both seats are filled.
    pub fn both(&self) -> Option<(&PlayerId, &PlayerId)> {
        self.red.as_ref().zip(self.white.as_ref())
    }

    fn clear(&mut self) {
        self.red = None;
        self.white = None;
    }
}

/// Outcome of a move that ended the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEnd {
    /// Final status of the game.
    pub status: GameStatus,
    /// Identity paid the pot on a decisive result.
    pub winner_id: Option<PlayerId>,
    /// Pot that was settled.
    pub pot: Amount,
    /// First payout failure, if any; the match stays completed regardless.
    pub payout_error: Option<LedgerError>,
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    /// Position after the move.
    pub state: GameState,
    /// Present when the move ended the game.
    pub end: Option<MatchEnd>,
}

/// A wagered checkers match between two seated players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Match {
    /// Match identifier.
    id: MatchId,
    /// Current position.
    state: GameState,
    /// Seated identities.
    seats: Seats,
    /// Amount each player escrows.
    stake: Amount,
    /// Escrowed total; zero until the match activates.
    pot: Amount,
    /// Lifecycle status.
    status: MatchStatus,
    /// Creation time.
    created_at: DateTime<Utc>,
}

impl Match {
    /// Creates a pending match in the standard starting position.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidStake`] if the pot `2 × stake` would
    /// overflow.
    pub fn new(id: MatchId, stake: Amount) -> Result<Self, MatchError> {
        Self::from_state(id, stake, GameState::new())
    }

    /// Creates a pending match that starts from `state`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidStake`] if the pot `2 × stake` would
    /// overflow.
    #[instrument(skip(state), fields(to_move = %state.current_player()))]
    pub fn from_state(id: MatchId, stake: Amount, state: GameState) -> Result<Self, MatchError> {
        if stake.checked_mul(2).is_none() {
            warn!("Stake too large to form a pot");
            return Err(MatchError::InvalidStake(stake));
        }
        info!(match_id = %id, stake, "Creating match");
        Ok(Self {
            id,
            state,
            seats: Seats::default(),
            stake,
            pot: 0,
            status: MatchStatus::Pending,
            created_at: Utc::now(),
        })
    }

    /// Seats `player_id` on `seat`, escrowing both stakes once both seats
    /// are filled.
    ///
    /// Joining a seat already held by the same identity changes nothing,
    /// except that it retries an escrow left unfinished with both seats
    /// filled.
    ///
    /// # Errors
    ///
    /// - [`MatchError::SeatTaken`] if another identity holds the seat.
    /// - [`MatchError::Escrow`] if either deduction fails. Both seats are
    ///   cleared, a player already charged is refunded, and the match stays
    ///   pending.
    #[instrument(skip(self, ledger), fields(match_id = %self.id))]
    pub async fn join(
        &mut self,
        seat: Player,
        player_id: &str,
        ledger: &dyn Ledger,
    ) -> Result<(), MatchError> {
        match self.seats.get(seat) {
            Some(holder) if holder != player_id => {
                warn!(holder = %holder, "Seat already taken");
                return Err(MatchError::SeatTaken(seat));
            }
            Some(_) => info!("Player already seated"),
            None => {
                *self.seats.slot(seat) = Some(player_id.to_string());
                info!("Player seated");
            }
        }

        // Pending with both seats filled: escrow is due, or an earlier one
        // never finished.
        if self.status == MatchStatus::Pending && self.seats.both().is_some() {
            self.escrow(ledger).await?;
        }
        Ok(())
    }

    async fn escrow(&mut self, ledger: &dyn Ledger) -> Result<(), MatchError> {
        let Some((red, white)) = self.seats.both() else {
            return Ok(());
        };
        let (red, white) = (red.clone(), white.clone());

        if let Err(e) = ledger.deduct(&red, self.stake).await {
            warn!(player_id = %red, error = %e, "Escrow failed");
            self.seats.clear();
            return Err(MatchError::Escrow(e));
        }

        if let Err(e) = ledger.deduct(&white, self.stake).await {
            warn!(player_id = %white, error = %e, "Escrow failed");
            if let Err(refund) = ledger.deposit(&red, self.stake).await {
                error!(player_id = %red, error = %refund, "Escrow refund failed");
            }
            self.seats.clear();
            return Err(MatchError::Escrow(e));
        }

        self.pot = self.stake.saturating_mul(2);
        self.status = MatchStatus::Active;
        info!(pot = self.pot, "Match activated");
        Ok(())
    }

    /// Applies `mv` for `player_id`, who claims to be playing `side`.
    ///
    /// On the move that ends the game the match completes and the pot is
    /// paid out: all of it to the winner, or one stake back to each seat on a
    /// draw.
    ///
    /// # Errors
    ///
    /// - [`MatchError::InactiveMatch`] unless the match is active.
    /// - [`MatchError::AuthenticationMismatch`] unless `player_id` holds
    ///   `side`.
    /// - Any rule rejection from the move validator; the position is left
    ///   unchanged.
    #[instrument(skip(self, mv, ledger), fields(match_id = %self.id, mv = %mv))]
    pub async fn submit_move(
        &mut self,
        player_id: &str,
        side: Player,
        mv: &Move,
        ledger: &dyn Ledger,
    ) -> Result<MoveReport, MatchError> {
        if self.status != MatchStatus::Active {
            warn!(status = %self.status, "Move on inactive match");
            return Err(MatchError::InactiveMatch(self.status));
        }

        if self.seats.get(side).map(String::as_str) != Some(player_id) {
            warn!("Player is not seated on the claimed side");
            return Err(MatchError::AuthenticationMismatch {
                player_id: player_id.to_string(),
                side,
            });
        }

        let next = rules::validate_and_apply(&self.state, mv, side).map_err(|e| {
            warn!(error = %e, "Move rejected");
            MatchError::from(e)
        })?;
        let status = rules::evaluate(&next);
        self.state = next;
        info!(move_number = self.state.move_number(), "Move applied");

        if !status.is_over() {
            return Ok(MoveReport {
                state: self.state.clone(),
                end: None,
            });
        }

        self.status = MatchStatus::Completed;
        info!(%status, "Match completed");
        let end = self.settle(status, ledger).await;
        Ok(MoveReport {
            state: self.state.clone(),
            end: Some(end),
        })
    }

    async fn settle(&self, status: GameStatus, ledger: &dyn Ledger) -> MatchEnd {
        let mut payout_error = None;
        let mut winner_id = None;

        let payouts: Vec<(&PlayerId, Amount)> = match status.winner() {
            Some(winner) => {
                winner_id = self.seats.get(winner).cloned();
                self.seats.get(winner).map(|id| (id, self.pot)).into_iter().collect()
            }
            None => {
                let share = self.pot / 2;
                [Player::Red, Player::White]
                    .into_iter()
                    .filter_map(|seat| self.seats.get(seat).map(|id| (id, share)))
                    .collect()
            }
        };

        for (player_id, amount) in payouts {
            match ledger.payout(player_id, amount).await {
                Ok(()) => info!(player_id = %player_id, amount, "Paid out"),
                Err(e) => {
                    error!(player_id = %player_id, amount, error = %e, "Payout failed");
                    payout_error.get_or_insert(e);
                }
            }
        }

        MatchEnd {
            status,
            winner_id,
            pot: self.pot,
            payout_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    fn funded() -> MemoryLedger {
        MemoryLedger::with_balances([("alice", 100), ("bob", 100)])
    }

    #[tokio::test]
    async fn test_new_match_is_pending() {
        let m = Match::new("m1".to_string(), 20).expect("valid stake");
        assert_eq!(*m.status(), MatchStatus::Pending);
        assert_eq!(*m.pot(), 0);
        assert_eq!(m.state(), &GameState::new());
        assert!(m.seats().both().is_none());
    }

    #[test]
    fn test_oversized_stake_rejected() {
        let err = Match::new("m1".to_string(), Amount::MAX).expect_err("overflowing pot");
        assert_eq!(err, MatchError::InvalidStake(Amount::MAX));
    }

    #[tokio::test]
    async fn test_second_join_activates() {
        let ledger = funded();
        let mut m = Match::new("m1".to_string(), 20).expect("valid stake");

        m.join(Player::Red, "alice", &ledger).await.expect("seat red");
        assert_eq!(*m.status(), MatchStatus::Pending);

        m.join(Player::White, "bob", &ledger).await.expect("seat white");
        assert_eq!(*m.status(), MatchStatus::Active);
        assert_eq!(*m.pot(), 40);
        assert_eq!(ledger.balance("alice").await, Ok(80));
        assert_eq!(ledger.balance("bob").await, Ok(80));
    }

    #[tokio::test]
    async fn test_rejoin_is_idempotent() {
        let ledger = funded();
        let mut m = Match::new("m1".to_string(), 20).expect("valid stake");
        m.join(Player::Red, "alice", &ledger).await.expect("seat red");
        m.join(Player::Red, "alice", &ledger).await.expect("same identity");

        let err = m.join(Player::Red, "bob", &ledger).await.expect_err("taken");
        assert_eq!(err, MatchError::SeatTaken(Player::Red));
        assert_eq!(m.seats().get(Player::Red).map(String::as_str), Some("alice"));
    }

    #[tokio::test]
    async fn test_move_before_activation_rejected() {
        let ledger = funded();
        let mut m = Match::new("m1".to_string(), 20).expect("valid stake");
        m.join(Player::Red, "alice", &ledger).await.expect("seat red");

        let err = m
            .submit_move("alice", Player::Red, &Move::step(20, 16), &ledger)
            .await
            .expect_err("pending");
        assert_eq!(err, MatchError::InactiveMatch(MatchStatus::Pending));
    }
}
