//! Priority-cascade opponent.
//!
//! For whichever player is on turn, the first rule that yields an action wins:
//!
//! 1. **Win**: an action that completes a line right now.
//! 2. **Block**: deny the opponent's immediate win.
//! 3. **Strategic**: prefer points from the configured preference list.
//! 4. **Fallback**: first free point (placement) or a random legal move.
//!
//! Every what-if is evaluated on a fresh `PieceSet` built with the same
//! update helpers the state machine uses, so the live state is never touched.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::core::{Action, GamePhase, GameRng, GameState, PieceSet, PlayerId, Position, ValidMove};
use crate::rules;

use super::policy::Opponent;

/// Default preference order: corners, then center, then edge midpoints.
pub const STRATEGIC_POSITIONS: [Position; 9] = [
    Position::new(0, 0),
    Position::new(2, 0),
    Position::new(0, 2),
    Position::new(2, 2),
    Position::new(1, 1),
    Position::new(1, 0),
    Position::new(0, 1),
    Position::new(2, 1),
    Position::new(1, 2),
];

/// Heuristic opponent configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicConfig {
    /// Preferred points, most preferred first.
    ///
    /// Movement only treats membership as a preference; placement takes the
    /// first free entry in list order.
    pub strategic_positions: Vec<Position>,

    /// Seed for the random movement fallback.
    pub seed: u64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            strategic_positions: STRATEGIC_POSITIONS.to_vec(),
            seed: 42,
        }
    }
}

impl HeuristicConfig {
    /// Replace the preference list.
    #[must_use]
    pub fn with_strategic_positions(mut self, positions: impl Into<Vec<Position>>) -> Self {
        self.strategic_positions = positions.into();
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Win > block > strategic > fallback opponent.
#[derive(Clone, Debug)]
pub struct HeuristicOpponent {
    config: HeuristicConfig,
    rng: GameRng,
}

impl Default for HeuristicOpponent {
    fn default() -> Self {
        Self::new(HeuristicConfig::default())
    }
}

impl HeuristicOpponent {
    /// Create an opponent seeded from the config.
    #[must_use]
    pub fn new(config: HeuristicConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self { config, rng }
    }

    /// Create an opponent drawing from an existing RNG branch.
    #[must_use]
    pub fn with_rng(config: HeuristicConfig, rng: GameRng) -> Self {
        Self { config, rng }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    /// Choose where the current player places next.
    ///
    /// `None` outside a live placement phase.
    #[instrument(level = "debug", skip_all, fields(ai = %state.current_player))]
    pub fn placement_move(&self, state: &GameState) -> Option<Position> {
        if state.is_over() || state.phase != GamePhase::Placement {
            return None;
        }

        let ai = state.current_player;
        let pieces = &state.pieces;

        if let Some(position) = winning_placement(ai, pieces) {
            debug!(%position, "placing to win");
            return Some(position);
        }

        if let Some(position) = winning_placement(ai.other(), pieces) {
            debug!(%position, "placing to block");
            return Some(position);
        }

        if let Some(&position) = self
            .config
            .strategic_positions
            .iter()
            .find(|&&p| rules::is_valid_position(p) && !rules::is_occupied(p, pieces))
        {
            debug!(%position, "placing on strategic point");
            return Some(position);
        }

        let position = (0..3)
            .flat_map(|x| (0..3).map(move |y| Position::new(x, y)))
            .find(|&p| !rules::is_occupied(p, pieces));
        debug!(?position, "placing on first free point");
        position
    }

    /// Choose the current player's slide.
    ///
    /// `None` outside a live movement phase or when no slide is legal.
    #[instrument(level = "debug", skip_all, fields(ai = %state.current_player))]
    pub fn movement_move(&mut self, state: &GameState) -> Option<ValidMove> {
        if state.is_over() || state.phase != GamePhase::Movement {
            return None;
        }

        let ai = state.current_player;
        let opponent = ai.other();
        let pieces = &state.pieces;
        let moves = rules::all_valid_moves(ai, pieces);

        if moves.is_empty() {
            debug!("no legal move");
            return None;
        }

        if let Some(&mv) = moves
            .iter()
            .find(|mv| rules::check_winner(&after(pieces, mv)) == Some(ai))
        {
            debug!(from = %mv.from, to = %mv.to, "moving to win");
            return Some(mv);
        }

        if winning_move(opponent, pieces).is_some() {
            if let Some(&mv) = moves
                .iter()
                .find(|mv| winning_move(opponent, &after(pieces, mv)).is_none())
            {
                debug!(from = %mv.from, to = %mv.to, "moving to block");
                return Some(mv);
            }
            debug!("opponent threat cannot be blocked");
        }

        if let Some(&mv) = moves
            .iter()
            .find(|mv| self.config.strategic_positions.contains(&mv.to))
        {
            debug!(from = %mv.from, to = %mv.to, "moving to strategic point");
            return Some(mv);
        }

        let mv = self.rng.choose(&moves).copied();
        debug!(?mv, "moving at random");
        mv
    }
}

impl Opponent for HeuristicOpponent {
    fn choose_action(&mut self, state: &GameState) -> Option<Action> {
        match state.phase {
            GamePhase::Placement => self.placement_move(state).map(Action::Place),
            GamePhase::Movement => self.movement_move(state).map(Action::from),
        }
    }
}

fn after(pieces: &PieceSet, mv: &ValidMove) -> PieceSet {
    pieces.with_moved(mv.piece, mv.to)
}

/// A free point where `player`'s next piece would complete a line.
fn winning_placement(player: PlayerId, pieces: &PieceSet) -> Option<Position> {
    let next_piece = rules::unplaced_pieces(player, pieces).first().copied()?;
    rules::free_positions(pieces).into_iter().find(|&position| {
        rules::check_winner(&pieces.with_placed(next_piece.id, position)) == Some(player)
    })
}

/// A slide that would complete a line for `player`.
fn winning_move(player: PlayerId, pieces: &PieceSet) -> Option<ValidMove> {
    rules::all_valid_moves(player, pieces)
        .into_iter()
        .find(|mv| rules::check_winner(&after(pieces, mv)) == Some(player))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i8, y: i8) -> Position {
        Position::new(x, y)
    }

    fn placement_state(player_one: &[Position], player_two: &[Position], to_move: PlayerId) -> GameState {
        let mut state = GameState::new(0);
        state.pieces = PieceSet::with_layout(player_one, player_two);
        state.current_player = to_move;
        state
    }

    fn movement_state(player_one: &[Position], player_two: &[Position], to_move: PlayerId) -> GameState {
        let mut state = placement_state(player_one, player_two, to_move);
        state.phase = GamePhase::Movement;
        state
    }

    #[test]
    fn test_placement_takes_the_win() {
        let state = placement_state(&[pos(0, 2), pos(2, 2)], &[pos(0, 0), pos(1, 0)], PlayerId::Two);
        let ai = HeuristicOpponent::default();
        assert_eq!(ai.placement_move(&state), Some(pos(2, 0)));
    }

    #[test]
    fn test_placement_win_beats_block() {
        // Both sides threaten; winning comes first
        let state = placement_state(
            &[pos(0, 0), pos(0, 1)],
            &[pos(2, 0), pos(2, 1)],
            PlayerId::Two,
        );
        let ai = HeuristicOpponent::default();
        assert_eq!(ai.placement_move(&state), Some(pos(2, 2)));
    }

    #[test]
    fn test_placement_blocks() {
        let state = placement_state(&[pos(0, 0), pos(0, 1)], &[pos(1, 1)], PlayerId::Two);
        let ai = HeuristicOpponent::default();
        assert_eq!(ai.placement_move(&state), Some(pos(0, 2)));
    }

    #[test]
    fn test_placement_strategic_order() {
        let ai = HeuristicOpponent::default();

        let empty = GameState::new(0);
        assert_eq!(ai.placement_move(&empty), Some(pos(0, 0)));

        let state = placement_state(&[pos(0, 0)], &[], PlayerId::Two);
        assert_eq!(ai.placement_move(&state), Some(pos(2, 0)));

        let corners_taken = placement_state(
            &[pos(0, 0), pos(2, 2)],
            &[pos(2, 0), pos(0, 2)],
            PlayerId::One,
        );
        // Center completes a diagonal for either side
        assert_eq!(ai.placement_move(&corners_taken), Some(pos(1, 1)));
    }

    #[test]
    fn test_placement_fallback_scans_columns() {
        let config = HeuristicConfig::default().with_strategic_positions(Vec::new());
        let ai = HeuristicOpponent::new(config);

        let state = placement_state(&[pos(0, 0)], &[], PlayerId::Two);
        assert_eq!(ai.placement_move(&state), Some(pos(0, 1)));
    }

    #[test]
    fn test_placement_none_in_movement_phase() {
        let state = movement_state(
            &[pos(0, 0), pos(2, 1), pos(1, 2)],
            &[pos(1, 0), pos(0, 1), pos(2, 2)],
            PlayerId::One,
        );
        assert_eq!(HeuristicOpponent::default().placement_move(&state), None);
    }

    #[test]
    fn test_movement_takes_the_win() {
        let state = movement_state(
            &[pos(0, 1), pos(1, 2), pos(2, 2)],
            &[pos(0, 0), pos(1, 0), pos(1, 1)],
            PlayerId::Two,
        );
        let mut ai = HeuristicOpponent::default();
        let mv = ai.movement_move(&state).unwrap();

        assert_eq!(mv.to, pos(2, 0));
        assert_eq!(mv.from, pos(1, 1));
    }

    #[test]
    fn test_movement_blocks() {
        // Player one threatens (1,1) -> (2,0) completing the top row
        let state = movement_state(
            &[pos(0, 0), pos(1, 0), pos(1, 1)],
            &[pos(2, 1), pos(0, 2), pos(2, 2)],
            PlayerId::Two,
        );
        let mut ai = HeuristicOpponent::default();
        let mv = ai.movement_move(&state).unwrap();

        let after_block = state.pieces.with_moved(mv.piece, mv.to);
        assert!(winning_move(PlayerId::One, &after_block).is_none());
        assert_eq!(mv.to, pos(2, 0));
    }

    #[test]
    fn test_movement_random_fallback_is_seeded() {
        let config = HeuristicConfig::default()
            .with_strategic_positions(Vec::new())
            .with_seed(7);
        let state = movement_state(
            &[pos(0, 0), pos(2, 1), pos(1, 2)],
            &[pos(1, 0), pos(0, 1), pos(2, 2)],
            PlayerId::One,
        );

        let mut a = HeuristicOpponent::new(config.clone());
        let mut b = HeuristicOpponent::new(config);
        let legal = rules::all_valid_moves(PlayerId::One, &state.pieces);

        for _ in 0..10 {
            let mv = a.movement_move(&state).unwrap();
            assert_eq!(Some(mv), b.movement_move(&state));
            assert!(legal.contains(&mv));
        }
    }

    #[test]
    fn test_movement_none_when_no_moves() {
        let state = movement_state(
            &[pos(0, 0), pos(1, 0), pos(0, 1)],
            &[pos(1, 1), pos(2, 0), pos(0, 2)],
            PlayerId::One,
        );
        assert_eq!(HeuristicOpponent::default().movement_move(&state), None);
    }

    #[test]
    fn test_opponent_does_not_mutate_state() {
        let state = placement_state(&[pos(0, 0), pos(1, 0)], &[pos(1, 1)], PlayerId::Two);
        let before = state.clone();
        let mut ai = HeuristicOpponent::default();

        let _ = ai.choose_action(&state);
        assert_eq!(state, before);
    }
}
