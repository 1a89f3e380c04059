//! Game state: the aggregate root of one game.
//!
//! ## Lifecycle
//!
//! - Created by `GameState::new` with every piece unplaced, phase
//!   `Placement`, player one to act, status `Playing`.
//! - Replaced wholesale by each transition in `crate::game`; a state value
//!   is never edited after it has been handed out.
//! - Ends when status becomes `Won`; from then on every action is rejected.
//!
//! Uses `im` persistent data structures so snapshots and what-if copies are
//! O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::clock::Timestamp;
use super::piece::{PieceId, PieceSet};
use super::player::PlayerId;

/// Phase of a game in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Players take turns putting pieces on the board.
    Placement,
    /// All pieces are down; players slide one piece per turn.
    Movement,
}

/// Whether the game is still running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Actions are accepted.
    Playing,
    /// Terminal.
    Won,
}

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// The winner holds a full winning line.
    Alignment,
    /// The loser ran out of time on their turn.
    Timeout,
    /// The loser had no legal move on their turn.
    Blocked,
    /// The loser abandoned the game.
    Forfeit,
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndReason::Alignment => write!(f, "alignment"),
            EndReason::Timeout => write!(f, "timeout"),
            EndReason::Blocked => write!(f, "blocked"),
            EndReason::Forfeit => write!(f, "forfeit"),
        }
    }
}

/// Full state of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase.
    pub phase: GamePhase,

    /// Playing or won.
    pub status: GameStatus,

    /// Player whose turn it is.
    pub current_player: PlayerId,

    /// The six pieces.
    pub pieces: PieceSet,

    /// Set once status is `Won`.
    pub winner: Option<PlayerId>,

    /// Set once status is `Won`.
    pub end_reason: Option<EndReason>,

    /// Piece chosen by the current player in the movement phase.
    pub selected: Option<PieceId>,

    /// When the current turn started.
    pub turn_started_at: Timestamp,

    /// Time spent on completed turns, in milliseconds.
    pub total_game_time: u64,

    /// Turn number (starts at 1, incremented per committed action).
    pub turn_number: u32,

    /// Committed actions in order.
    pub history: Vector<ActionRecord>,
}

impl GameState {
    /// Fresh game starting at `now`.
    #[must_use]
    pub fn new(now: Timestamp) -> Self {
        Self {
            phase: GamePhase::Placement,
            status: GameStatus::Playing,
            current_player: PlayerId::One,
            pieces: PieceSet::new(),
            winner: None,
            end_reason: None,
            selected: None,
            turn_started_at: now,
            total_game_time: 0,
            turn_number: 1,
            history: Vector::new(),
        }
    }

    /// Check if the game is over.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Won
    }

    /// The losing player, once the game is over.
    #[must_use]
    pub fn loser(&self) -> Option<PlayerId> {
        self.winner.map(PlayerId::other)
    }

    /// Number of committed actions.
    #[must_use]
    pub fn turns_played(&self) -> u32 {
        self.turn_number.saturating_sub(1)
    }

    /// Milliseconds the current player has spent on this turn.
    #[must_use]
    pub fn turn_elapsed(&self, now: Timestamp) -> u64 {
        now.saturating_sub(self.turn_started_at)
    }
}
