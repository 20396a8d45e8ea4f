use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ops;
use crate::grid::{EngineError, Grid};

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Result of applying a move: the new board, whether anything moved, and
/// the points gained from merges. A move with `changed == false` must not
/// be treated as a played turn (no spawn, no move count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    pub changed: bool,
    pub score_delta: u32,
}

/// Packed 4x4 2048 board: 16 exponent nibbles in a `u64`, row-major from
/// the most significant nibble. `0` is empty, nibble `k` is the tile
/// `2^k`.
///
/// All operations have value semantics: they return a fresh board and
/// never mutate in place.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board(u64);

impl Board {
    pub const DIM: usize = 4;

    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board(0);

    /// Construct a `Board` from its raw packed representation.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Board(raw)
    }

    /// The raw packed `u64` for this board.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Build a board from 16 row-major tile values (0 = empty, otherwise
    /// powers of two up to 32768).
    pub fn from_values(values: &[u32; 16]) -> Result<Self, EngineError> {
        let mut raw = 0u64;
        for (idx, &v) in values.iter().enumerate() {
            let exp = match v {
                0 => 0,
                _ if v.is_power_of_two() && v <= 1 << 15 => v.trailing_zeros() as u64,
                _ => {
                    return Err(EngineError::InvalidGrid(format!(
                        "cell {idx} holds {v}, not a power of two in 2..=32768"
                    )))
                }
            };
            raw |= exp << (60 - 4 * idx);
        }
        Ok(Board(raw))
    }

    /// Fresh game: empty board plus two random spawns.
    pub fn new_game<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut board = Board::EMPTY;
        for _ in 0..2 {
            if let Some(next) = board.with_spawn(rng) {
                board = next;
            }
        }
        board
    }

    /// Slide and merge in `direction` without spawning.
    #[inline]
    pub fn shift(self, direction: Direction) -> MoveOutcome {
        ops::shift(self, direction)
    }

    /// One player turn: shift, then spawn a random tile iff the shift
    /// changed the board. The returned outcome carries the post-spawn
    /// board.
    pub fn step<R: Rng + ?Sized>(self, direction: Direction, rng: &mut R) -> MoveOutcome {
        let mut out = self.shift(direction);
        if out.changed {
            if let Some(spawned) = out.board.with_spawn(rng) {
                out.board = spawned;
            }
        }
        out
    }

    /// Insert a 2 (90%) or 4 (10%) into a uniformly chosen empty cell.
    /// `None` when the board is full.
    #[inline]
    pub fn with_spawn<R: Rng + ?Sized>(self, rng: &mut R) -> Option<Self> {
        ops::with_spawn(self, rng)
    }

    /// True while at least one move can still change the board: an empty
    /// cell exists or two equal tiles are orthogonally adjacent. The game
    /// is over exactly when this is false after a spawn.
    #[inline]
    pub fn has_any_move(self) -> bool {
        ops::has_any_move(self.0)
    }

    /// Actual tile value at row-major index `idx` (0 if empty).
    #[inline]
    pub fn tile_value(self, idx: usize) -> u32 {
        match ops::exponent(self.0, idx) {
            0 => 0,
            e => 1 << e,
        }
    }

    /// Number of empty cells.
    #[inline]
    pub fn count_empty(self) -> u32 {
        ops::count_empty(self.0)
    }

    /// Highest tile value on the board (0 for an empty board).
    pub fn highest_tile(self) -> u32 {
        (0..16).map(|idx| self.tile_value(idx)).max().unwrap_or(0)
    }

    /// Read-only snapshot for rendering.
    pub fn snapshot(self) -> Grid {
        Grid::new(Self::DIM, (0..16).map(|idx| self.tile_value(idx)).collect())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#018x})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            for col in 0..4 {
                let v = self.tile_value(row * 4 + col);
                if v == 0 {
                    write!(f, "{:>6}", ".")?;
                } else {
                    write!(f, "{:>6}", v)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
