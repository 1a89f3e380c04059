//! Binary snapshots of a game for the synchronized channel.
//!
//! A snapshot is the whole `GameState` serialized with `bincode`. Peers
//! replace their local state with whatever they decode, so decoding checks
//! that the bytes describe a state the state machine could have produced.

use thiserror::Error;

use crate::core::{
    GamePhase, GameState, GameStatus, PieceId, PlayerId, Position, PIECES_PER_PLAYER, TOTAL_PIECES,
};
use crate::rules;

/// Failure to encode, decode, or accept a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot serialization failed: {0}")]
    Codec(#[from] bincode::Error),

    #[error("expected 6 pieces, found {0}")]
    PieceCount(usize),

    #[error("piece at index {index} has id {id}")]
    PieceOrder { index: usize, id: PieceId },

    #[error("piece {0} has the wrong owner")]
    WrongOwner(PieceId),

    #[error("piece {piece} is placed off the board at {position}")]
    OffBoard { piece: PieceId, position: Position },

    #[error("piece {0} is unplaced but has a board position")]
    UnplacedOnBoard(PieceId),

    #[error("two pieces share {0}")]
    Overlap(Position),

    #[error("{placed} pieces placed is inconsistent with the {phase:?} phase")]
    PhaseMismatch { phase: GamePhase, placed: usize },

    #[error("game status and winner disagree")]
    WinnerMismatch,

    #[error("turn {turn} does not follow {recorded} recorded actions")]
    TurnCount { turn: u32, recorded: usize },

    #[error("{placed} pieces placed in {recorded} recorded actions")]
    PlacementCount { placed: usize, recorded: usize },

    /// Placed counts (one, two) do not allow `player` to be on turn.
    #[error("{player} cannot be on turn with {counts:?} pieces placed")]
    TurnOrder {
        player: PlayerId,
        counts: (usize, usize),
    },

    #[error("{0} holds a line but has not won")]
    UnreportedLine(PlayerId),
}

/// Serialize a state.
pub fn encode(state: &GameState) -> Result<Vec<u8>, SnapshotError> {
    Ok(bincode::serialize(state)?)
}

/// Deserialize and validate a state.
pub fn decode(bytes: &[u8]) -> Result<GameState, SnapshotError> {
    let state: GameState = bincode::deserialize(bytes)?;
    validate(&state)?;
    Ok(state)
}

/// Check that a state is one the state machine could have produced.
///
/// Covers the piece layout, the phase, the end-of-game fields, the turn
/// counter against the recorded actions, and whose turn it is during
/// placement.
pub fn validate(state: &GameState) -> Result<(), SnapshotError> {
    let pieces = &state.pieces;
    if pieces.len() != TOTAL_PIECES {
        return Err(SnapshotError::PieceCount(pieces.len()));
    }

    let mut seen: Vec<Position> = Vec::with_capacity(TOTAL_PIECES);
    for (index, piece) in pieces.iter().enumerate() {
        if usize::from(piece.id.0) != index {
            return Err(SnapshotError::PieceOrder { index, id: piece.id });
        }
        if piece.owner != piece.id.owner() {
            return Err(SnapshotError::WrongOwner(piece.id));
        }

        if piece.placed {
            if !rules::is_valid_position(piece.position) {
                return Err(SnapshotError::OffBoard {
                    piece: piece.id,
                    position: piece.position,
                });
            }
            if seen.contains(&piece.position) {
                return Err(SnapshotError::Overlap(piece.position));
            }
            seen.push(piece.position);
        } else if !piece.position.is_off_board() {
            return Err(SnapshotError::UnplacedOnBoard(piece.id));
        }
    }

    let placed = seen.len();
    let all_placed = placed == PIECES_PER_PLAYER * 2;
    if (state.phase == GamePhase::Movement) != all_placed {
        return Err(SnapshotError::PhaseMismatch {
            phase: state.phase,
            placed,
        });
    }

    let won = state.status == GameStatus::Won;
    if won != state.winner.is_some() || won != state.end_reason.is_some() {
        return Err(SnapshotError::WinnerMismatch);
    }
    if let Some(owner) = rules::check_winner(pieces) {
        if state.winner != Some(owner) {
            return Err(SnapshotError::UnreportedLine(owner));
        }
    }

    validate_turns(state, placed)
}

fn validate_turns(state: &GameState, placed: usize) -> Result<(), SnapshotError> {
    let recorded = state.history.len();
    if usize::try_from(state.turn_number).ok() != recorded.checked_add(1) {
        return Err(SnapshotError::TurnCount {
            turn: state.turn_number,
            recorded,
        });
    }

    let one = rules::placed_pieces(PlayerId::One, &state.pieces).len();
    let two = rules::placed_pieces(PlayerId::Two, &state.pieces).len();
    let in_turn = match state.phase {
        GamePhase::Placement => {
            if placed != recorded {
                return Err(SnapshotError::PlacementCount { placed, recorded });
            }
            match state.current_player {
                PlayerId::One => one == two,
                PlayerId::Two => one == two + 1,
            }
        }
        // Every committed action hands the turn over
        GamePhase::Movement => {
            if recorded < placed {
                return Err(SnapshotError::PlacementCount { placed, recorded });
            }
            (state.current_player == PlayerId::One) == (recorded % 2 == 0)
        }
    };
    if !in_turn {
        return Err(SnapshotError::TurnOrder {
            player: state.current_player,
            counts: (one, two),
        });
    }
    Ok(())
}
