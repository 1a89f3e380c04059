//! Computer opponents.
//!
//! - `Opponent`: the trait the session talks to
//! - `HeuristicOpponent`: rule-based cascade
//! - `RandomOpponent`: uniform baseline

pub mod heuristic;
pub mod policy;

pub use heuristic::{HeuristicConfig, HeuristicOpponent, STRATEGIC_POSITIONS};
pub use policy::{legal_actions, Opponent, OpponentKind, RandomOpponent};
