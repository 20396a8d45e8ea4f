use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Read-only row-major snapshot of a board, the only state either engine
/// exposes to rendering code. `0` denotes an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    dim: usize,
    cells: Vec<u32>,
}

impl Grid {
    pub(crate) fn new(dim: usize, cells: Vec<u32>) -> Self {
        debug_assert_eq!(cells.len(), dim * dim);
        Grid { dim, cells }
    }

    /// Side length N of the square grid.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Cell at (row, col). Panics on out-of-range coordinates.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        assert!(row < self.dim && col < self.dim);
        self.cells[row * self.dim + col]
    }

    /// Iterate rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.dim)
    }
}

/// Precondition violations. There is no recovery path: the caller discards
/// the session and starts a fresh grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Malformed board: wrong dimension, duplicate or missing tile labels.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    /// Input the engine cannot interpret, e.g. a tile label outside the
    /// board's label range.
    #[error("invalid move: {0}")]
    InvalidMove(String),
}
