//! Pure state-transition engines for two grid puzzles sharing nothing but
//! a common snapshot type:
//!
//! - [`merge`]: 2048 rules on a fixed 4x4 board. Directional moves compress
//!   and merge equal neighbors, spawns are random, the game ends when no
//!   move can change the board.
//! - [`sliding`]: the 15-puzzle (3x3 to 5x5). Tiles adjacent to the empty
//!   slot swap into it; shuffles are uniform and repaired to be solvable.
//!
//! Every operation takes a board and returns a new one plus auxiliary
//! results (changed flag, score delta); no engine holds mutable state
//! between calls. Randomness is always injected as `&mut impl Rng` so
//! seeded tests are deterministic.
//!
//! [`session`] layers move counting, cumulative score, and the
//! active/terminal state machine on top of the engines; [`store`] is the
//! boundary to score persistence.

pub mod grid;
pub mod merge;
pub mod session;
pub mod sliding;
pub mod store;

pub use grid::{EngineError, Grid};
pub use merge::{Board, Direction, MoveOutcome};
pub use session::{MergeGame, SlideGame, Status};
pub use sliding::{Puzzle, SlideOutcome};
pub use store::{MemoryScoreStore, ScoreStore, StoreError};
