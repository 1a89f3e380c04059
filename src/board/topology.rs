//! Static board topology.
//!
//! The board is a 3×3 grid of intersections joined by its rows, columns and
//! both diagonals. Every grid point is a legal intersection, but only points
//! joined by a drawn line are adjacent: the center reaches all eight others,
//! while corners and edge midpoints reach exactly three.

use crate::core::Position;

const fn p(x: i8, y: i8) -> Position {
    Position::new(x, y)
}

/// All intersections: corners, edge midpoints, center.
pub const POINTS: [Position; 9] = [
    p(0, 0), p(2, 0), p(0, 2), p(2, 2),
    p(1, 0), p(0, 1), p(2, 1), p(1, 2),
    p(1, 1),
];

/// Three-in-a-row lines: rows, columns, diagonals.
pub const WINNING_LINES: [[Position; 3]; 8] = [
    [p(0, 0), p(1, 0), p(2, 0)],
    [p(0, 1), p(1, 1), p(2, 1)],
    [p(0, 2), p(1, 2), p(2, 2)],
    [p(0, 0), p(0, 1), p(0, 2)],
    [p(1, 0), p(1, 1), p(1, 2)],
    [p(2, 0), p(2, 1), p(2, 2)],
    [p(0, 0), p(1, 1), p(2, 2)],
    [p(2, 0), p(1, 1), p(0, 2)],
];

// Indexed by `Position::grid_index`.
const ADJACENCY: [&[Position]; 9] = [
    &[p(1, 0), p(0, 1), p(1, 1)],
    &[p(0, 0), p(2, 0), p(1, 1)],
    &[p(1, 0), p(2, 1), p(1, 1)],
    &[p(0, 0), p(0, 2), p(1, 1)],
    &[p(0, 0), p(1, 0), p(2, 0), p(0, 1), p(2, 1), p(0, 2), p(1, 2), p(2, 2)],
    &[p(2, 0), p(2, 2), p(1, 1)],
    &[p(0, 1), p(1, 2), p(1, 1)],
    &[p(0, 2), p(2, 2), p(1, 1)],
    &[p(2, 1), p(1, 2), p(1, 1)],
];

/// Check if `position` is one of the nine intersections.
#[must_use]
pub fn is_valid_position(position: Position) -> bool {
    POINTS.contains(&position)
}

/// Points joined to `position` by a board line.
///
/// Empty for anything off the board.
#[must_use]
pub fn neighbors(position: Position) -> &'static [Position] {
    if !is_valid_position(position) {
        return &[];
    }
    position.grid_index().map_or(&[], |index| ADJACENCY[index])
}

/// Check if `a` and `b` are joined by a board line.
#[must_use]
pub fn are_adjacent(a: Position, b: Position) -> bool {
    neighbors(a).contains(&b)
}

/// Winning lines passing through `position`.
pub fn lines_through(position: Position) -> impl Iterator<Item = &'static [Position; 3]> {
    let lines: &'static [[Position; 3]; 8] = &WINNING_LINES;
    lines.iter().filter(move |line| line.contains(&position))
}
