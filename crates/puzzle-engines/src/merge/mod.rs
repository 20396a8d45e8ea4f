//! Merge engine: 2048 rules on a packed 4x4 board.
//!
//! - [`Board`] is the packed state, 16 exponent nibbles in a `u64`.
//! - A move compresses each line toward the target edge and merges equal
//!   neighbors scanning from that edge; each resulting cell merges at most
//!   once per move.
//! - Per-line results and score deltas are precomputed for all 2^16 lines;
//!   column moves go through the bitwise transpose.

mod ops;
mod state;
mod tables;

pub use state::{Board, Direction, MoveOutcome};

/// Eagerly build the line lookup tables. Optional: they are built lazily
/// on first use either way.
pub fn init() {
    tables::stores();
}
