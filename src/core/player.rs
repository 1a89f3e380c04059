//! Player identification, display identity, and per-player storage.
//!
//! ## PlayerId
//!
//! The two seats of a game. Numbered 1 and 2 to match how players are shown.
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `PlayerId`.
//!
//! ## Player
//!
//! Display identity (name, color, avatar, score, AI flag). The rules engine
//! never looks at it; the session uses it for attribution and AI branching.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// Moves first.
    One,
    /// Moves second.
    Two,
}

impl PlayerId {
    /// Both seats in turn order.
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// The other seat.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Displayed number (1 or 2).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    /// 0-based index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.number() as usize - 1
    }

    /// Parse the displayed number.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Per-player data with O(1) access.
///
/// ```
/// use fanorona_telo::core::{PlayerId, PlayerMap};
///
/// let mut wins: PlayerMap<u32> = PlayerMap::with_value(0);
/// wins[PlayerId::Two] += 1;
/// assert_eq!(wins[PlayerId::One], 0);
/// assert_eq!(wins[PlayerId::Two], 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(mut factory: impl FnMut(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::One), factory(PlayerId::Two)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over `(PlayerId, &T)` pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T: Default> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// Display identity of a player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Seat this identity occupies.
    pub id: PlayerId,
    /// Shown name.
    pub name: String,
    /// CSS-style color string.
    pub color: String,
    /// Optional avatar identifier.
    pub avatar: Option<String>,
    /// Games won across the session.
    pub score: u32,
    /// Whether the heuristic opponent plays this seat.
    pub is_ai: bool,
}

impl Player {
    /// Create a human player with zero score.
    pub fn new(id: PlayerId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            avatar: None,
            score: 0,
            is_ai: false,
        }
    }

    /// Mark this seat as played by the AI.
    #[must_use]
    pub fn ai(mut self) -> Self {
        self.is_ai = true;
        self
    }

    /// Set the avatar.
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Default identities for a new session.
    #[must_use]
    pub fn defaults() -> PlayerMap<Player> {
        PlayerMap::new(|id| match id {
            PlayerId::One => Player::new(id, "Joueur 1", "#FA7070"),
            PlayerId::Two => Player::new(id, "Joueur 2", "#4A90E2"),
        })
    }
}
