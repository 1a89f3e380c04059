//! # fanorona-telo
//!
//! Rules engine, state machine, and heuristic opponent for Fanorona-telo,
//! the three-piece Malagasy alignment game on a 3×3 board.
//!
//! ## Design Principles
//!
//! 1. **Pure transitions**: Every rule is a function from a state to a new
//!    state (or a rejection). Nothing is edited in place.
//!
//! 2. **One rulebook**: The state machine and the opponent share the same
//!    rule functions and piece-set update helpers.
//!
//! 3. **Explicit time and randomness**: Timestamps are passed in; the only
//!    random choice goes through a seeded `GameRng`.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) state cloning via `im-rs`, so
//!   the opponent can explore what-if positions freely.
//!
//! - **Session on top**: Scores, turn timer, AI pacing, and peer sync live
//!   in `session`, outside the game state itself.
//!
//! ## Modules
//!
//! - `core`: Positions, players, pieces, actions, state, settings, clocks, RNG
//! - `board`: Static intersections, adjacency, and winning lines
//! - `rules`: Legality, win detection, move enumeration
//! - `game`: Placement and movement transitions
//! - `ai`: Opponent trait, heuristic and random opponents
//! - `session`: Scores, history, timing, snapshots

pub mod core;
pub mod board;
pub mod rules;
pub mod game;
pub mod ai;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Position, PlayerId, PlayerMap, Player,
    PieceId, GamePiece, PieceSet,
    Action, ActionRecord, ValidMove,
    GamePhase, GameStatus, EndReason, GameState,
    GameSettings, GameRng, GameRngState,
    Clock, ManualClock, SystemClock, Timestamp,
};

pub use crate::rules::{all_valid_moves, can_move_to, check_winner, is_valid_position};

pub use crate::game::{apply_action, apply_move, apply_placement, Rejection};

pub use crate::ai::{HeuristicConfig, HeuristicOpponent, Opponent, OpponentKind, RandomOpponent};

pub use crate::session::{GameHistory, HistoryEntry, Session, SessionError, SessionEvent, SnapshotError};
