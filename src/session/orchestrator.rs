//! Session orchestrator.
//!
//! A `Session` owns everything that outlives a single game: both player
//! identities and their scores, the settings, the clock, the opponents, and
//! the history of finished games. It turns clicks and clock ticks into
//! state-machine transitions.
//!
//! ## AI timing
//!
//! When an AI seat comes on turn the session records a deadline
//! (`ai_move_delay_ms` from now) tagged with the current game generation.
//! `tick` performs the AI action once the deadline has passed. Starting a new
//! game or adopting a peer's state bumps the generation, so a deadline
//! scheduled before never fires. Handing the seat back to a human drops it.

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::ai::{HeuristicConfig, Opponent, OpponentKind};
use crate::core::{
    Action, Clock, EndReason, GamePhase, GameRng, GameSettings, GameState, Player, PlayerId,
    PlayerMap, Position, SystemClock, Timestamp,
};
use crate::game::{self, Rejection};

use super::history::{GameHistory, HistoryEntry};
use super::snapshot::{self, SnapshotError};

/// Failure of a session operation.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The state machine refused the action.
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// Human input arrived while an AI seat is on turn.
    #[error("not your turn: {0} is played by the AI")]
    AiSeat(PlayerId),

    /// A peer's state could not be decoded or failed validation.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Something `tick` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The AI committed an action.
    AiMoved { player: PlayerId, action: Action },
    /// The player on turn ran out of time and lost.
    TimedOut { loser: PlayerId },
    /// The AI produced no action, or one the state machine refused
    /// (`rejection`). The state is unchanged and the AI is rescheduled.
    AiStalled {
        player: PlayerId,
        rejection: Option<Rejection>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingAi {
    due_at: Timestamp,
    generation: u64,
}

/// Long-lived game session.
pub struct Session<C: Clock = SystemClock> {
    players: PlayerMap<Player>,
    settings: GameSettings,
    clock: C,
    rng: GameRng,
    heuristic: HeuristicConfig,
    opponent_kinds: PlayerMap<OpponentKind>,
    opponents: PlayerMap<Box<dyn Opponent>>,
    state: GameState,
    history: GameHistory,
    generation: u64,
    pending_ai: Option<PendingAi>,
}

impl<C: Clock> Session<C> {
    /// Create a session with default players and start the first game.
    pub fn new(settings: GameSettings, clock: C) -> Self {
        let mut rng = GameRng::new(settings.seed);
        let heuristic = HeuristicConfig::default().with_seed(settings.seed);
        let opponent_kinds = PlayerMap::with_value(OpponentKind::default());
        let opponents = build_opponents(&opponent_kinds, &heuristic, &mut rng);
        let state = GameState::new(clock.now_millis());
        let history = GameHistory::new(settings.max_history);

        Self {
            players: Player::defaults(),
            settings,
            clock,
            rng,
            heuristic,
            opponent_kinds,
            opponents,
            state,
            history,
            generation: 0,
            pending_ai: None,
        }
    }

    /// Replace both player identities.
    #[must_use]
    pub fn with_players(mut self, players: PlayerMap<Player>) -> Self {
        self.players = players;
        self.reschedule_ai();
        self
    }

    /// Use `kind` for both AI seats.
    #[must_use]
    pub fn with_opponent(mut self, kind: OpponentKind, config: HeuristicConfig) -> Self {
        self.heuristic = config;
        self.opponent_kinds = PlayerMap::with_value(kind);
        self.opponents = build_opponents(&self.opponent_kinds, &self.heuristic, &mut self.rng);
        self
    }

    /// Use `kind` for one seat when it is played by the AI.
    #[must_use]
    pub fn with_seat_opponent(mut self, seat: PlayerId, kind: OpponentKind) -> Self {
        self.opponent_kinds[seat] = kind;
        self.opponents = build_opponents(&self.opponent_kinds, &self.heuristic, &mut self.rng);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The game in progress, or the one just finished.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Both player identities with their scores.
    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    /// One seat's identity.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    /// Settings the session was created with.
    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Finished games, newest first.
    #[must_use]
    pub fn history(&self) -> &GameHistory {
        &self.history
    }

    /// Clock the session reads time from.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// When the pending AI action becomes due, if one is scheduled.
    #[must_use]
    pub fn ai_due_at(&self) -> Option<Timestamp> {
        self.pending_ai
            .filter(|p| p.generation == self.generation)
            .map(|p| p.due_at)
    }

    /// Milliseconds left on the current turn, or `None` without a limit.
    #[must_use]
    pub fn time_remaining(&self) -> Option<u64> {
        let limit = self.settings.turn_time_limit_ms?;
        Some(limit.saturating_sub(self.state.turn_elapsed(self.clock.now_millis())))
    }

    // =========================================================================
    // Game flow
    // =========================================================================

    /// Abandon the current game and start a fresh one.
    ///
    /// Scores and history are kept.
    pub fn new_game(&mut self) {
        let now = self.clock.now_millis();
        self.generation += 1;
        self.pending_ai = None;
        self.opponents = build_opponents(&self.opponent_kinds, &self.heuristic, &mut self.rng);
        self.state = GameState::new(now);
        info!(
            generation = self.generation,
            player_one = %self.players[PlayerId::One].name,
            player_two = %self.players[PlayerId::Two].name,
            "new game"
        );
        self.reschedule_ai();
    }

    /// Human click on a board point.
    ///
    /// Places a piece in the placement phase; selects or moves in the
    /// movement phase. A click after the turn has already run out ends the
    /// game on time and is rejected.
    #[instrument(level = "debug", skip(self), fields(player = %self.state.current_player))]
    pub fn click(&mut self, position: Position) -> Result<&GameState, SessionError> {
        let now = self.clock.now_millis();
        if self.check_timeout(now).is_some() {
            return Err(Rejection::GameOver.into());
        }

        let player = self.state.current_player;
        if !self.state.is_over() && self.players[player].is_ai {
            return Err(SessionError::AiSeat(player));
        }

        let next = match self.state.phase {
            GamePhase::Placement => game::apply_placement(&self.state, position, now)?,
            GamePhase::Movement => game::apply_move(&self.state, position, now)?,
        };
        self.commit(next, now);
        Ok(&self.state)
    }

    /// Apply a complete action attributed to `player`.
    pub fn play(&mut self, player: PlayerId, action: Action) -> Result<&GameState, SessionError> {
        let now = self.clock.now_millis();
        if self.check_timeout(now).is_some() {
            return Err(Rejection::GameOver.into());
        }

        let next = game::apply_action_as(&self.state, player, action, now)?;
        self.commit(next, now);
        Ok(&self.state)
    }

    /// The player on turn gives up.
    pub fn forfeit(&mut self) -> Result<&GameState, SessionError> {
        let now = self.clock.now_millis();
        let next = game::forfeit(&self.state, now)?;
        self.commit(next, now);
        Ok(&self.state)
    }

    /// Poll the clock.
    ///
    /// Ends the game when the turn limit is exceeded, otherwise performs a
    /// due AI action. An AI that cannot act is tried again after another
    /// delay, and the time limit still applies to it.
    pub fn tick(&mut self) -> Result<Option<SessionEvent>, SessionError> {
        let now = self.clock.now_millis();
        if self.state.is_over() {
            return Ok(None);
        }

        if let Some(loser) = self.check_timeout(now) {
            return Ok(Some(SessionEvent::TimedOut { loser }));
        }

        let Some(pending) = self.pending_ai else {
            return Ok(None);
        };
        if pending.generation != self.generation {
            self.pending_ai = None;
            return Ok(None);
        }
        if now < pending.due_at {
            return Ok(None);
        }
        self.pending_ai = None;

        let player = self.state.current_player;
        let Some(action) = self.opponents[player].choose_action(&self.state) else {
            warn!(%player, "AI found no action");
            self.reschedule_ai();
            return Ok(Some(SessionEvent::AiStalled {
                player,
                rejection: None,
            }));
        };

        match game::apply_action(&self.state, action, now) {
            Ok(next) => {
                debug!(%player, %action, "AI moved");
                self.commit(next, now);
                Ok(Some(SessionEvent::AiMoved { player, action }))
            }
            Err(rejection) => {
                warn!(%player, %action, %rejection, "AI action refused");
                self.reschedule_ai();
                Ok(Some(SessionEvent::AiStalled {
                    player,
                    rejection: Some(rejection),
                }))
            }
        }
    }

    // =========================================================================
    // Players, scores, history
    // =========================================================================

    /// Edit a player's identity in place.
    pub fn update_player(&mut self, id: PlayerId, update: impl FnOnce(&mut Player)) {
        update(&mut self.players[id]);
        self.players[id].id = id;
        self.reschedule_ai();
    }

    /// Change a player's display name. Past history entries keep the old one.
    pub fn rename_player(&mut self, id: PlayerId, name: impl Into<String>) {
        let name = name.into();
        self.update_player(id, |player| player.name = name);
    }

    /// Hand a seat to the AI or back to a human.
    pub fn set_ai(&mut self, id: PlayerId, is_ai: bool) {
        self.update_player(id, |player| player.is_ai = is_ai);
    }

    /// Zero both scores. History is kept.
    pub fn reset_scores(&mut self) {
        for id in PlayerId::ALL {
            self.players[id].score = 0;
        }
        info!("scores reset");
    }

    /// Drop every finished-game entry. Scores are kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
        info!("history cleared");
    }

    // =========================================================================
    // Synchronization
    // =========================================================================

    /// Encode the current state for a peer.
    pub fn snapshot(&self) -> Result<Vec<u8>, SessionError> {
        Ok(snapshot::encode(&self.state)?)
    }

    /// Replace the local state with one received from a peer.
    ///
    /// The last received state wins. It is validated first; an invalid state
    /// leaves the session untouched.
    pub fn sync_remote(&mut self, state: GameState) -> Result<&GameState, SessionError> {
        snapshot::validate(&state)?;
        let now = self.clock.now_millis();
        self.generation += 1;
        self.pending_ai = None;
        debug!(turn = state.turn_number, "state replaced from peer");
        self.commit(state, now);
        Ok(&self.state)
    }

    /// Decode a peer's snapshot and adopt it.
    pub fn sync_remote_bytes(&mut self, bytes: &[u8]) -> Result<&GameState, SessionError> {
        let state = snapshot::decode(bytes)?;
        self.sync_remote(state)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_timeout(&mut self, now: Timestamp) -> Option<PlayerId> {
        let limit = self.settings.turn_time_limit_ms?;
        let next = game::timeout_turn(&self.state, now, limit)?;
        let loser = self.state.current_player;
        self.commit(next, now);
        Some(loser)
    }

    fn commit(&mut self, next: GameState, now: Timestamp) {
        let was_over = self.state.is_over();
        let turn_changed = next.turn_number != self.state.turn_number;
        self.state = next;

        if self.state.is_over() {
            self.pending_ai = None;
            if !was_over {
                self.record_result(now);
            }
        } else if turn_changed || self.pending_ai.is_none() {
            self.pending_ai = None;
            self.reschedule_ai();
        }
    }

    fn reschedule_ai(&mut self) {
        if self.state.is_over() || !self.players[self.state.current_player].is_ai {
            self.pending_ai = None;
            return;
        }
        if self.ai_due_at().is_some() {
            return;
        }
        let due_at = self
            .clock
            .now_millis()
            .saturating_add(self.settings.ai_move_delay_ms);
        debug!(player = %self.state.current_player, due_at, "AI scheduled");
        self.pending_ai = Some(PendingAi {
            due_at,
            generation: self.generation,
        });
    }

    fn record_result(&mut self, now: Timestamp) {
        let Some(winner) = self.state.winner else {
            return;
        };
        let loser = winner.other();
        self.players[winner].score += 1;

        let entry = HistoryEntry {
            timestamp: now,
            winner: self.players[winner].clone(),
            loser: self.players[loser].clone(),
            duration_secs: self.state.total_game_time / 1000,
            total_turns: self.state.turns_played(),
            reason: self.state.end_reason.unwrap_or(EndReason::Alignment),
        };
        info!(
            winner = %entry.winner.name,
            loser = %entry.loser.name,
            reason = %entry.reason,
            duration_secs = entry.duration_secs,
            "game recorded"
        );
        self.history.push(entry);
    }
}

fn build_opponents(
    kinds: &PlayerMap<OpponentKind>,
    config: &HeuristicConfig,
    rng: &mut GameRng,
) -> PlayerMap<Box<dyn Opponent>> {
    PlayerMap::new(|seat| kinds[seat].build(config, rng.fork()))
}
