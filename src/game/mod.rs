//! Game state machine.
//!
//! Placement → movement → won. Transitions are pure functions from one
//! `GameState` to the next; rejected actions leave the input untouched.

pub mod error;
pub mod machine;

pub use error::Rejection;
pub use machine::{
    apply_action, apply_action_as, apply_move, apply_placement, ensure_turn, forfeit, timeout_turn,
};
