//! Game pieces and the immutable piece set.
//!
//! Each game has exactly six pieces, three per player. Piece ids are stable
//! for the lifetime of a game: player one owns ids 0..3, player two owns
//! 3..6. Pieces are fungible for play purposes; ids only exist so that a move
//! can name the token it relocates.
//!
//! `PieceSet` is backed by `im::Vector` so that every transition (real or
//! simulated by the opponent) produces a new set in O(1) without aliasing
//! the previous one.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::position::Position;

/// Pieces owned by each player.
pub const PIECES_PER_PLAYER: usize = 3;

/// Pieces in a full game.
pub const TOTAL_PIECES: usize = PIECES_PER_PLAYER * 2;

/// Stable identifier of a piece within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u8);

impl PieceId {
    /// Owner implied by the id.
    #[must_use]
    pub const fn owner(self) -> PlayerId {
        if (self.0 as usize) < PIECES_PER_PLAYER {
            PlayerId::One
        } else {
            PlayerId::Two
        }
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let owner = self.owner();
        let slot = self.0 as usize - owner.index() * PIECES_PER_PLAYER;
        write!(f, "p{}-{}", owner.number(), slot)
    }
}

/// One player token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GamePiece {
    /// Stable id.
    pub id: PieceId,
    /// Owning player.
    pub owner: PlayerId,
    /// Current point; `Position::OFF_BOARD` while unplaced.
    pub position: Position,
    /// Whether the piece is on the board.
    pub placed: bool,
}

impl GamePiece {
    /// Create an unplaced piece.
    #[must_use]
    pub const fn unplaced(id: PieceId) -> Self {
        Self {
            id,
            owner: id.owner(),
            position: Position::OFF_BOARD,
            placed: false,
        }
    }

    /// Check if this piece sits on `position`.
    #[must_use]
    pub fn is_at(&self, position: Position) -> bool {
        self.placed && self.position == position
    }
}

/// The six pieces of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSet {
    pieces: Vector<GamePiece>,
}

impl PieceSet {
    /// All six pieces, unplaced.
    #[must_use]
    pub fn new() -> Self {
        let pieces = (0..TOTAL_PIECES as u8)
            .map(|i| GamePiece::unplaced(PieceId(i)))
            .collect();
        Self { pieces }
    }

    /// Build a set with the given points occupied.
    ///
    /// Each list fills that player's pieces in id order; remaining pieces
    /// stay unplaced. Extra points beyond three are ignored.
    ///
    /// ```
    /// use fanorona_telo::core::{PieceSet, PlayerId, Position};
    ///
    /// let pieces = PieceSet::with_layout(
    ///     &[Position::new(0, 0), Position::new(1, 0)],
    ///     &[Position::new(1, 1)],
    /// );
    /// assert_eq!(pieces.placed_count(), 3);
    /// assert_eq!(pieces.owner_at(Position::new(1, 1)), Some(PlayerId::Two));
    /// ```
    #[must_use]
    pub fn with_layout(player_one: &[Position], player_two: &[Position]) -> Self {
        let mut set = Self::new();
        for (player, points) in [(PlayerId::One, player_one), (PlayerId::Two, player_two)] {
            let base = player.index() * PIECES_PER_PLAYER;
            for (slot, &point) in points.iter().take(PIECES_PER_PLAYER).enumerate() {
                set = set.with_placed(PieceId((base + slot) as u8), point);
            }
        }
        set
    }

    /// Build a set from raw pieces (e.g. a decoded snapshot).
    #[must_use]
    pub fn from_pieces(pieces: impl IntoIterator<Item = GamePiece>) -> Self {
        Self {
            pieces: pieces.into_iter().collect(),
        }
    }

    /// Iterate over all pieces in id order.
    pub fn iter(&self) -> impl Iterator<Item = &GamePiece> {
        self.pieces.iter()
    }

    /// Number of pieces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Check if the set holds no pieces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Look up a piece by id.
    #[must_use]
    pub fn get(&self, id: PieceId) -> Option<&GamePiece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// The placed piece sitting on `position`, if any.
    #[must_use]
    pub fn piece_at(&self, position: Position) -> Option<&GamePiece> {
        self.pieces.iter().find(|p| p.is_at(position))
    }

    /// Owner of the piece on `position`, if any.
    #[must_use]
    pub fn owner_at(&self, position: Position) -> Option<PlayerId> {
        self.piece_at(position).map(|p| p.owner)
    }

    /// Number of placed pieces.
    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.placed).count()
    }

    /// Check if every piece is on the board.
    #[must_use]
    pub fn all_placed(&self) -> bool {
        self.pieces.iter().all(|p| p.placed)
    }

    /// New set with `id` placed on `position`.
    ///
    /// Unknown ids leave the set unchanged.
    #[must_use]
    pub fn with_placed(&self, id: PieceId, position: Position) -> Self {
        self.with_updated(id, |piece| {
            piece.position = position;
            piece.placed = true;
        })
    }

    /// New set with `id` relocated to `position`.
    #[must_use]
    pub fn with_moved(&self, id: PieceId, position: Position) -> Self {
        self.with_updated(id, |piece| piece.position = position)
    }

    fn with_updated(&self, id: PieceId, update: impl FnOnce(&mut GamePiece)) -> Self {
        let mut pieces = self.pieces.clone();
        if let Some(index) = pieces.iter().position(|p| p.id == id) {
            let mut piece = pieces[index];
            update(&mut piece);
            pieces.set(index, piece);
        }
        Self { pieces }
    }
}

impl Default for PieceSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a PieceSet {
    type Item = &'a GamePiece;
    type IntoIter = im::vector::Iter<'a, GamePiece>;

    fn into_iter(self) -> Self::IntoIter {
        self.pieces.iter()
    }
}
