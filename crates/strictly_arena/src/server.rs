//! JSON-over-HTTP adapter for the match registry.
//!
//! Handlers translate requests into [`MatchManager`] calls and map
//! [`MatchError`]s onto status codes. Pushing updates to spectators is left
//! to whatever transport sits in front of this router.

use crate::error::MatchError;
use crate::ledger::{Amount, LedgerError, PlayerId};
use crate::manager::MatchManager;
use crate::matches::{Match, MatchId, MoveReport};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use strictly_checkers::{Move, Player};
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    manager: MatchManager,
    default_stake: Amount,
}

/// Body of `POST /matches`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMatchRequest {
    /// Match identifier.
    pub id: MatchId,
    /// Per-player stake; the configured default when omitted.
    pub stake: Option<Amount>,
}

/// Body of `POST /matches/{id}/join`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    /// Seat to take.
    pub seat: Player,
    /// Identity taking the seat.
    pub player_id: PlayerId,
}

/// Body of `POST /matches/{id}/moves`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Identity submitting the move.
    pub player_id: PlayerId,
    /// Side the identity claims to play.
    pub side: Player,
    /// The move itself.
    #[serde(rename = "move")]
    pub mv: Move,
}

/// Response of `GET /players/{id}/balance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// Player queried.
    pub player_id: PlayerId,
    /// Current balance.
    pub balance: Amount,
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
    /// Forced capture, when the rejection was a missed capture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Move>,
}

/// Handler error mapped onto an HTTP response.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum ApiError {
    /// Match operation rejected.
    #[display("{}", _0)]
    Match(MatchError),
    /// Ledger query failed.
    #[display("{}", _0)]
    Ledger(LedgerError),
}

impl std::error::Error for ApiError {}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Match(err) => match err {
                MatchError::MatchNotFound(_) => StatusCode::NOT_FOUND,
                MatchError::MatchExists(_)
                | MatchError::SeatTaken(_)
                | MatchError::NotYourTurn(_)
                | MatchError::InactiveMatch(_) => StatusCode::CONFLICT,
                MatchError::InvalidStake(_) | MatchError::InvalidMoveSequence(_) => {
                    StatusCode::BAD_REQUEST
                }
                MatchError::Escrow(LedgerError::InsufficientFunds { .. }) => {
                    StatusCode::PAYMENT_REQUIRED
                }
                MatchError::Escrow(LedgerError::Storage(_)) => StatusCode::SERVICE_UNAVAILABLE,
                MatchError::AuthenticationMismatch { .. } => StatusCode::FORBIDDEN,
                MatchError::MandatoryCaptureViolation { .. } | MatchError::IllegalMove(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                MatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Ledger(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let suggestion = match &self {
            ApiError::Match(err) => err.suggestion().cloned(),
            ApiError::Ledger(_) => None,
        };
        warn!(%status, error = %self, "Request rejected");
        let body = ErrorBody {
            error: self.to_string(),
            suggestion,
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the arena router.
#[instrument(skip(manager))]
pub fn router(manager: MatchManager, default_stake: Amount) -> Router {
    let state = AppState {
        manager,
        default_stake,
    };
    Router::new()
        .route("/", get(health))
        .route("/matches", get(list_matches).post(create_match))
        .route("/matches/{id}", get(get_match))
        .route("/matches/{id}/board", get(board))
        .route("/matches/{id}/join", post(join))
        .route("/matches/{id}/moves", post(submit_move))
        .route("/players/{id}/balance", get(balance))
        .with_state(state)
}

/// Serves the arena router on `address` until the process stops.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound or serving fails.
#[instrument(skip(manager))]
pub async fn serve(
    address: &str,
    manager: MatchManager,
    default_stake: Amount,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!(address, "Arena listening");
    axum::serve(listener, router(manager, default_stake)).await
}

async fn health() -> &'static str {
    "strictly_arena ok"
}

#[instrument(skip(state))]
async fn list_matches(State(state): State<AppState>) -> Json<Vec<MatchId>> {
    Json(state.manager.list_matches().await)
}

#[instrument(skip(state))]
async fn create_match(
    State(state): State<AppState>,
    Json(request): Json<CreateMatchRequest>,
) -> Result<(StatusCode, Json<Match>), ApiError> {
    let stake = request.stake.unwrap_or(state.default_stake);
    let created = state.manager.create_match(request.id, stake).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<Json<Match>, ApiError> {
    match state.manager.get_match(&id).await {
        Some(found) => Ok(Json(found)),
        None => Err(MatchError::MatchNotFound(id).into()),
    }
}

#[instrument(skip(state))]
async fn board(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
) -> Result<String, ApiError> {
    Ok(state.manager.debug_board(&id).await?)
}

#[instrument(skip(state))]
async fn join(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
    Json(request): Json<JoinRequest>,
) -> Result<Json<Match>, ApiError> {
    state.manager.get_or_create(&id, state.default_stake).await?;
    let joined = state
        .manager
        .join(&id, request.seat, &request.player_id)
        .await?;
    Ok(Json(joined))
}

#[instrument(skip(state))]
async fn submit_move(
    State(state): State<AppState>,
    Path(id): Path<MatchId>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveReport>, ApiError> {
    let report = state
        .manager
        .submit_move(&id, &request.player_id, request.side, request.mv)
        .await?;
    Ok(Json(report))
}

#[instrument(skip(state))]
async fn balance(
    State(state): State<AppState>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.manager.ledger().balance(&player_id).await?;
    Ok(Json(BalanceResponse { player_id, balance }))
}
