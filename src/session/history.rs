//! Completed-game history.
//!
//! Newest entry first, capped at a configurable length. Entries carry a
//! copy of both player identities as they were when the game ended, so
//! renaming a player later does not rewrite past results.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::config::DEFAULT_MAX_HISTORY;
use crate::core::{EndReason, Player, Timestamp};

/// One finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the game ended.
    pub timestamp: Timestamp,
    pub winner: Player,
    pub loser: Player,
    /// Wall time of the game in whole seconds.
    pub duration_secs: u64,
    /// Committed actions.
    pub total_turns: u32,
    pub reason: EndReason,
}

/// Bounded, newest-first list of finished games.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameHistory {
    entries: Vector<HistoryEntry>,
    max_entries: usize,
}

impl Default for GameHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl GameHistory {
    /// Empty history keeping at most `max_entries` games.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vector::new(),
            max_entries,
        }
    }

    /// Record a game, dropping the oldest beyond the cap.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.max_entries);
    }

    /// Change the cap, trimming if needed.
    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = max_entries;
        self.entries.truncate(max_entries);
    }

    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent game.
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Wins keyed by player name.
    #[must_use]
    pub fn win_counts(&self) -> FxHashMap<String, u32> {
        let mut counts = FxHashMap::default();
        for entry in &self.entries {
            *counts.entry(entry.winner.name.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Wins by `name` as a rounded percentage of all recorded games.
    ///
    /// 0 for an empty history.
    #[must_use]
    pub fn win_rate(&self, name: &str) -> u32 {
        let total = self.entries.len();
        if total == 0 {
            return 0;
        }
        let wins = self.entries.iter().filter(|e| e.winner.name == name).count();
        ((wins as f64 / total as f64) * 100.0).round() as u32
    }

    /// Every name that appears as winner or loser, sorted.
    #[must_use]
    pub fn player_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| [e.winner.name.as_str(), e.loser.name.as_str()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }
}

impl<'a> IntoIterator for &'a GameHistory {
    type Item = &'a HistoryEntry;
    type IntoIter = im::vector::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
