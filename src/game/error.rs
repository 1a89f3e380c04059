//! Rejection reasons for game actions.

use thiserror::Error;

use crate::core::{GamePhase, PlayerId, Position};

/// Why an action was refused.
///
/// Every rejection is local and recoverable: the state passed in is left
/// exactly as it was and the same player is expected to try again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Placement target already holds a piece.
    #[error("position {0} is already occupied")]
    PositionOccupied(Position),

    /// Target is not one of the nine intersections.
    #[error("position {0} is not a board intersection")]
    InvalidPosition(Position),

    /// Destination is occupied, off the board, or not joined by a line.
    #[error("cannot move from {from} to {to}")]
    InvalidDestination {
        /// Source point.
        from: Position,
        /// Refused destination.
        to: Position,
    },

    /// A destination was clicked before any piece was selected.
    #[error("select one of your pieces before choosing a destination")]
    NoSelection,

    /// The named source point does not hold one of the player's pieces.
    #[error("{player} has no piece on {position}")]
    NotYourPiece {
        /// Acting player.
        player: PlayerId,
        /// Point that was named.
        position: Position,
    },

    /// Someone other than the current player tried to act.
    #[error("it is {expected}'s turn, not {actual}'s")]
    NotYourTurn {
        /// Player on turn.
        expected: PlayerId,
        /// Player who tried to act.
        actual: PlayerId,
    },

    /// Placement requested but the player has no piece left in hand.
    #[error("{0} has no piece left to place")]
    NoUnplacedPiece(PlayerId),

    /// The action belongs to the other phase.
    #[error("action not allowed during the {0:?} phase")]
    WrongPhase(GamePhase),

    /// The game has already been decided.
    #[error("the game is over")]
    GameOver,
}
