//! Board topology: intersections, adjacency, and winning lines.
//!
//! Pure compile-time data with query functions. Nothing here can fail or
//! change at runtime.

pub mod topology;

pub use topology::{are_adjacent, is_valid_position, lines_through, neighbors, POINTS, WINNING_LINES};
