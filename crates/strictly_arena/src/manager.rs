//! Registry of live matches.

use crate::error::MatchError;
use crate::ledger::{Amount, Ledger};
use crate::matches::{Match, MatchId, MoveReport};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use strictly_checkers::{GameState, Move, Player};
use tokio::sync::{Mutex, RwLock};
use tracing::{Instrument, Span, debug, error, info, instrument, warn};

type SharedMatch = Arc<Mutex<Match>>;

/// Owns every match and the ledger they settle against.
///
/// Each match sits behind its own mutex, so transitions on one match are
/// serialized while different matches proceed in parallel. The registry lock
/// is only held to look a match up or insert one.
#[derive(Debug, Clone)]
pub struct MatchManager {
    matches: Arc<RwLock<HashMap<MatchId, SharedMatch>>>,
    ledger: Arc<dyn Ledger>,
}

impl MatchManager {
    /// Creates an empty registry backed by `ledger`.
    #[instrument(skip(ledger))]
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        info!("Creating match manager");
        Self {
            matches: Arc::new(RwLock::new(HashMap::new())),
            ledger,
        }
    }

    /// Returns the ledger matches settle against.
    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    /// Creates a pending match in the standard starting position.
    ///
    /// # Errors
    ///
    /// - [`MatchError::MatchExists`] if `id` is already registered.
    /// - [`MatchError::InvalidStake`] if the stake cannot form a pot.
    #[instrument(skip(self))]
    pub async fn create_match(&self, id: MatchId, stake: Amount) -> Result<Match, MatchError> {
        self.insert(Match::new(id, stake)?).await
    }

    /// Creates a pending match that starts from a custom position.
    ///
    /// # Errors
    ///
    /// Same as [`MatchManager::create_match`].
    #[instrument(skip(self, state))]
    pub async fn create_match_from_state(
        &self,
        id: MatchId,
        stake: Amount,
        state: GameState,
    ) -> Result<Match, MatchError> {
        self.insert(Match::from_state(id, stake, state)?).await
    }

    async fn insert(&self, new_match: Match) -> Result<Match, MatchError> {
        let mut matches = self.matches.write().await;
        if matches.contains_key(new_match.id()) {
            warn!(match_id = %new_match.id(), "Match already exists");
            return Err(MatchError::MatchExists(new_match.id().clone()));
        }
        matches.insert(new_match.id().clone(), Arc::new(Mutex::new(new_match.clone())));
        info!(match_id = %new_match.id(), count = matches.len(), "Registered match");
        Ok(new_match)
    }

    /// Returns the match `id`, creating it with `stake` if absent.
    ///
    /// Lookup and insertion happen under one write lock, so concurrent
    /// callers agree on a single match.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidStake`] if a new match cannot be created.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self, id: &str, stake: Amount) -> Result<Match, MatchError> {
        let shared = {
            let mut matches = self.matches.write().await;
            match matches.get(id) {
                Some(existing) => Arc::clone(existing),
                None => {
                    let created = Match::new(id.to_string(), stake)?;
                    let shared = Arc::new(Mutex::new(created));
                    matches.insert(id.to_string(), Arc::clone(&shared));
                    info!("Registered match on first join");
                    shared
                }
            }
        };
        let snapshot = shared.lock().await.clone();
        Ok(snapshot)
    }

    /// Returns a snapshot of the match `id`.
    #[instrument(skip(self))]
    pub async fn get_match(&self, id: &str) -> Option<Match> {
        let shared = self.lookup(id).await.ok()?;
        let snapshot = shared.lock().await.clone();
        Some(snapshot)
    }

    /// Lists registered match ids, sorted.
    #[instrument(skip(self))]
    pub async fn list_matches(&self) -> Vec<MatchId> {
        let mut ids: Vec<_> = self.matches.read().await.keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed matches");
        ids
    }

    /// Renders the board of match `id` as text.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::MatchNotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub async fn debug_board(&self, id: &str) -> Result<String, MatchError> {
        let shared = self.lookup(id).await?;
        let m = shared.lock().await;
        Ok(format!(
            "{}\n{} to move (move {})",
            m.state().board().display(),
            m.state().current_player(),
            m.state().move_number()
        ))
    }

    /// Seats `player_id` on `seat` of match `id`.
    ///
    /// # Errors
    ///
    /// [`MatchError::MatchNotFound`] for an unknown id, otherwise see
    /// [`Match::join`].
    #[instrument(skip(self))]
    pub async fn join(&self, id: &str, seat: Player, player_id: &str) -> Result<Match, MatchError> {
        let shared = self.lookup(id).await?;
        let ledger = Arc::clone(&self.ledger);
        let player_id = player_id.to_string();
        run_detached(async move {
            let mut m = shared.lock().await;
            m.join(seat, &player_id, ledger.as_ref()).await?;
            Ok(m.clone())
        })
        .await
    }

    /// Submits `mv` to match `id` on behalf of `player_id` playing `side`.
    ///
    /// # Errors
    ///
    /// [`MatchError::MatchNotFound`] for an unknown id, otherwise see
    /// [`Match::submit_move`].
    #[instrument(skip(self, mv), fields(mv = %mv))]
    pub async fn submit_move(
        &self,
        id: &str,
        player_id: &str,
        side: Player,
        mv: Move,
    ) -> Result<MoveReport, MatchError> {
        let shared = self.lookup(id).await?;
        let ledger = Arc::clone(&self.ledger);
        let player_id = player_id.to_string();
        run_detached(async move {
            let mut m = shared.lock().await;
            m.submit_move(&player_id, side, &mv, ledger.as_ref()).await
        })
        .await
    }

    async fn lookup(&self, id: &str) -> Result<SharedMatch, MatchError> {
        self.matches
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| {
                debug!(match_id = id, "Match not found");
                MatchError::MatchNotFound(id.to_string())
            })
    }
}

/// Runs a match transition on its own task.
///
/// The task owns the match lock until the transition finishes, so a caller
/// that goes away mid-escrow or mid-payout cannot leave it half applied.
async fn run_detached<T, F>(transition: F) -> Result<T, MatchError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, MatchError>> + Send + 'static,
{
    tokio::spawn(transition.instrument(Span::current()))
        .await
        .map_err(|e| {
            error!(error = %e, "Match transition task failed");
            MatchError::Internal(e.to_string())
        })?
}
