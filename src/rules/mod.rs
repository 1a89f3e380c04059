//! Rules engine: pure functions over a piece set.
//!
//! - Position validity and occupancy
//! - Adjacency-based move legality
//! - Win detection
//! - Move enumeration
//!
//! The state machine in `crate::game` and the opponent in `crate::ai` both
//! build on these; neither re-implements a rule.

pub mod engine;

pub use engine::{
    all_valid_moves, can_move_to, can_player_move, check_winner, free_positions, is_occupied,
    is_valid_position, placed_pieces, player_pieces, unplaced_pieces, MoveList, PieceList,
};
