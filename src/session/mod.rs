//! Long-lived session around individual games.
//!
//! - `Session`: scores, timing, AI scheduling, peer sync
//! - `GameHistory`: finished games and win statistics
//! - `snapshot`: bincode encoding for the synchronized channel

pub mod history;
pub mod orchestrator;
pub mod snapshot;

pub use history::{GameHistory, HistoryEntry};
pub use orchestrator::{Session, SessionError, SessionEvent};
pub use snapshot::{decode, encode, validate, SnapshotError};
