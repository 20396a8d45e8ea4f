//! Sliding engine: the 15-puzzle on a 3x3 to 5x5 board.
//!
//! Tiles labeled `1..N²-1` plus one empty slot; a move swaps a tile that is
//! orthogonally adjacent to the empty slot into it. Shuffles are uniform
//! Fisher-Yates permutations repaired to the solvable parity class, so
//! every dealt board can reach the ascending arrangement.

mod ops;
mod state;

pub use state::{Puzzle, SlideOutcome};
