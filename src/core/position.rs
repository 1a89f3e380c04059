//! Board coordinates.
//!
//! A `Position` is a plain `(x, y)` pair on the implied 3×3 grid. Whether a
//! pair is an actual intersection is decided by the board topology, not by
//! this type: any pair can be constructed, including the off-board sentinel
//! used for pieces that have not been placed yet.

use serde::{Deserialize, Serialize};

/// Grid coordinate of a board intersection.
///
/// `x` grows to the right, `y` grows downward; both are in `0..=2` for real
/// board points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Column (0..=2).
    pub x: i8,
    /// Row (0..=2).
    pub y: i8,
}

impl Position {
    /// Sentinel position held by unplaced pieces.
    pub const OFF_BOARD: Position = Position { x: -1, y: -1 };

    /// Create a new position.
    #[must_use]
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Check if this is the unplaced sentinel.
    #[must_use]
    pub const fn is_off_board(self) -> bool {
        self.x == Self::OFF_BOARD.x && self.y == Self::OFF_BOARD.y
    }

    /// Row-major index into the 3×3 grid, or `None` outside it.
    #[must_use]
    pub fn grid_index(self) -> Option<usize> {
        if (0..3).contains(&self.x) && (0..3).contains(&self.y) {
            Some(self.y as usize * 3 + self.x as usize)
        } else {
            None
        }
    }
}

impl From<(i8, i8)> for Position {
    fn from((x, y): (i8, i8)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
