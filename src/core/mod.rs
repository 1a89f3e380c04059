//! Core value types: positions, players, pieces, actions, state, settings,
//! clocks, and RNG.
//!
//! Everything here is plain data. Game rules live in `rules` and `game`.

pub mod position;
pub mod player;
pub mod piece;
pub mod action;
pub mod state;
pub mod config;
pub mod clock;
pub mod rng;

pub use position::Position;
pub use player::{Player, PlayerId, PlayerMap};
pub use piece::{GamePiece, PieceId, PieceSet, PIECES_PER_PLAYER, TOTAL_PIECES};
pub use action::{Action, ActionRecord, ValidMove};
pub use state::{EndReason, GamePhase, GameState, GameStatus};
pub use config::GameSettings;
pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use rng::{GameRng, GameRngState};
