//! Opponent seam.
//!
//! Anything that can pick an action for the player on turn implements
//! `Opponent`. The session drives its AI seat through this trait only.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Action, GamePhase, GameRng, GameState};
use crate::rules;

use super::heuristic::{HeuristicConfig, HeuristicOpponent};

// =============================================================================
// Opponent
// =============================================================================

/// Policy choosing an action for `state.current_player`.
pub trait Opponent: Send {
    /// Choose an action for the player on turn.
    ///
    /// Returns `None` if the game is over or no legal action exists.
    fn choose_action(&mut self, state: &GameState) -> Option<Action>;
}

impl<O: Opponent + ?Sized> Opponent for Box<O> {
    fn choose_action(&mut self, state: &GameState) -> Option<Action> {
        (**self).choose_action(state)
    }
}

/// Every action the player on turn could commit.
#[must_use]
pub fn legal_actions(state: &GameState) -> SmallVec<[Action; 9]> {
    if state.is_over() {
        return SmallVec::new();
    }
    match state.phase {
        GamePhase::Placement => {
            if rules::unplaced_pieces(state.current_player, &state.pieces).is_empty() {
                return SmallVec::new();
            }
            rules::free_positions(&state.pieces)
                .into_iter()
                .map(Action::Place)
                .collect()
        }
        GamePhase::Movement => rules::all_valid_moves(state.current_player, &state.pieces)
            .into_iter()
            .map(Action::from)
            .collect(),
    }
}

/// Uniform random opponent.
#[derive(Clone, Debug)]
pub struct RandomOpponent {
    rng: GameRng,
}

impl RandomOpponent {
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }
}

impl Opponent for RandomOpponent {
    fn choose_action(&mut self, state: &GameState) -> Option<Action> {
        let actions = legal_actions(state);
        if actions.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range_usize(0..actions.len());
        Some(actions[idx])
    }
}

// =============================================================================
// Opponent selection
// =============================================================================

/// Which built-in opponent to seat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpponentKind {
    /// Win, block, strategic, fallback.
    #[default]
    Heuristic,
    /// Uniformly random legal actions.
    Random,
}

impl OpponentKind {
    /// Build the opponent, drawing randomness from `rng`.
    #[must_use]
    pub fn build(self, config: &HeuristicConfig, rng: GameRng) -> Box<dyn Opponent> {
        match self {
            OpponentKind::Heuristic => Box::new(HeuristicOpponent::with_rng(config.clone(), rng)),
            OpponentKind::Random => Box::new(RandomOpponent::new(rng)),
        }
    }
}

impl std::fmt::Display for OpponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpponentKind::Heuristic => write!(f, "heuristic"),
            OpponentKind::Random => write!(f, "random"),
        }
    }
}
