//! Action representation.
//!
//! Fanorona-telo has exactly two kinds of action:
//! - `Place(p)`: put the player's next unplaced piece on `p` (placement phase)
//! - `Move { from, to }`: slide a piece along one board line (movement phase)

use serde::{Deserialize, Serialize};

use super::piece::PieceId;
use super::player::PlayerId;
use super::position::Position;

/// A complete game action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Place the next unplaced piece.
    Place(Position),
    /// Move the piece on `from` to the adjacent point `to`.
    Move {
        /// Occupied source point.
        from: Position,
        /// Free adjacent destination.
        to: Position,
    },
}

impl Action {
    /// The point the action ends on.
    #[must_use]
    pub fn destination(&self) -> Position {
        match *self {
            Action::Place(to) | Action::Move { to, .. } => to,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Place(at) => write!(f, "place {at}"),
            Action::Move { from, to } => write!(f, "move {from} -> {to}"),
        }
    }
}

/// A legal one-step move produced by move enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidMove {
    /// The piece being moved.
    pub piece: PieceId,
    /// Its current point.
    pub from: Position,
    /// Free adjacent destination.
    pub to: Position,
}

impl From<ValidMove> for Action {
    fn from(mv: ValidMove) -> Self {
        Action::Move {
            from: mv.from,
            to: mv.to,
        }
    }
}

/// A committed action with metadata for history tracking.
///
/// Used for:
/// - Turn counts in completed-game summaries
/// - Replay/debugging
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who acted.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number the action was committed on (starts at 1).
    pub turn: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32) -> Self {
        Self {
            player,
            action,
            turn,
        }
    }
}
