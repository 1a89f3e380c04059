//! Rules engine: legality checks, win detection, move enumeration.
//!
//! Every function here is pure. They read a `PieceSet` and never modify it;
//! callers that want to see the effect of an action build a new set with
//! `PieceSet::with_placed` / `PieceSet::with_moved` and query that.
//!
//! These functions check *physical* legality only. Whose turn it is and
//! which phase the game is in are the state machine's concern.

use smallvec::SmallVec;

use crate::board;
use crate::core::{GamePiece, PieceSet, PlayerId, Position, ValidMove};

/// Moves available to one player. Three pieces with at most a handful of
/// free neighbours each fit inline.
pub type MoveList = SmallVec<[ValidMove; 8]>;

/// A player's pieces.
pub type PieceList = SmallVec<[GamePiece; 3]>;

/// Check if `position` is one of the nine intersections.
#[must_use]
pub fn is_valid_position(position: Position) -> bool {
    board::is_valid_position(position)
}

/// Check if a placed piece sits exactly on `position`.
#[must_use]
pub fn is_occupied(position: Position, pieces: &PieceSet) -> bool {
    pieces.iter().any(|piece| piece.is_at(position))
}

/// Check if a piece on `from` may slide to `to`.
///
/// `to` must be a free intersection joined to `from` by a board line. Who
/// owns the piece on `from` is not checked.
#[must_use]
pub fn can_move_to(from: Position, to: Position, pieces: &PieceSet) -> bool {
    is_valid_position(to) && !is_occupied(to, pieces) && board::are_adjacent(from, to)
}

/// Find the player holding a complete winning line.
///
/// Lines are checked in table order and the first uniformly-owned full line
/// decides.
#[must_use]
pub fn check_winner(pieces: &PieceSet) -> Option<PlayerId> {
    board::WINNING_LINES.iter().find_map(|line| {
        let mut owners = line.iter().map(|&point| pieces.owner_at(point));
        let first = owners.next().flatten()?;
        owners.all(|owner| owner == Some(first)).then_some(first)
    })
}

/// All of a player's pieces, placed or not, in id order.
#[must_use]
pub fn player_pieces(player: PlayerId, pieces: &PieceSet) -> PieceList {
    pieces.iter().filter(|p| p.owner == player).copied().collect()
}

/// A player's pieces currently on the board.
#[must_use]
pub fn placed_pieces(player: PlayerId, pieces: &PieceSet) -> PieceList {
    pieces
        .iter()
        .filter(|p| p.owner == player && p.placed)
        .copied()
        .collect()
}

/// A player's pieces still waiting to be placed, in id order.
#[must_use]
pub fn unplaced_pieces(player: PlayerId, pieces: &PieceSet) -> PieceList {
    pieces
        .iter()
        .filter(|p| p.owner == player && !p.placed)
        .copied()
        .collect()
}

/// Check if any placed piece of `player` has a free neighbour.
#[must_use]
pub fn can_player_move(player: PlayerId, pieces: &PieceSet) -> bool {
    placed_pieces(player, pieces).iter().any(|piece| {
        board::neighbors(piece.position)
            .iter()
            .any(|&to| !is_occupied(to, pieces))
    })
}

/// Every legal one-step move for `player`.
///
/// Ordered by piece id, then by the board's adjacency order.
#[must_use]
pub fn all_valid_moves(player: PlayerId, pieces: &PieceSet) -> MoveList {
    let mut moves = MoveList::new();

    for piece in placed_pieces(player, pieces) {
        for &to in board::neighbors(piece.position) {
            if !is_occupied(to, pieces) {
                moves.push(ValidMove {
                    piece: piece.id,
                    from: piece.position,
                    to,
                });
            }
        }
    }

    moves
}

/// Unoccupied intersections in board-table order.
#[must_use]
pub fn free_positions(pieces: &PieceSet) -> SmallVec<[Position; 9]> {
    board::POINTS
        .iter()
        .copied()
        .filter(|&point| !is_occupied(point, pieces))
        .collect()
}
