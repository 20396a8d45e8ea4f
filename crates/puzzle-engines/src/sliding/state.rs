use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ops;
use crate::grid::{EngineError, Grid};

/// Result of attempting to slide a tile: the resulting puzzle and whether
/// anything moved. A non-adjacent tile leaves the puzzle unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideOutcome {
    pub puzzle: Puzzle,
    pub changed: bool,
}

/// Sliding-tile board: row-major cells holding a permutation of
/// `0..dim*dim` where `0` is the empty slot and `1..=dim*dim-1` are the
/// tile labels. Moves permute positions, never values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Puzzle {
    dim: usize,
    cells: Vec<u8>,
}

impl Puzzle {
    pub const MIN_DIM: usize = 3;
    pub const MAX_DIM: usize = 5;

    /// The canonical solved arrangement: `1, 2, ..., N²-1, 0`.
    pub fn solved(dim: usize) -> Result<Self, EngineError> {
        check_dim(dim)?;
        let n = dim * dim;
        let mut cells: Vec<u8> = (1..n as u8).collect();
        cells.push(0);
        Ok(Puzzle { dim, cells })
    }

    /// Validate an arbitrary cell layout: `dim*dim` cells forming a
    /// permutation of `0..dim*dim` with exactly one empty slot.
    pub fn from_cells(dim: usize, cells: Vec<u8>) -> Result<Self, EngineError> {
        check_dim(dim)?;
        let n = dim * dim;
        if cells.len() != n {
            return Err(EngineError::InvalidGrid(format!(
                "expected {n} cells, got {}",
                cells.len()
            )));
        }
        let mut seen = vec![false; n];
        for &c in &cells {
            if (c as usize) >= n || seen[c as usize] {
                return Err(EngineError::InvalidGrid(format!(
                    "cells are not a permutation of 0..{n}"
                )));
            }
            seen[c as usize] = true;
        }
        Ok(Puzzle { dim, cells })
    }

    /// Deal a new game: uniform shuffle of all cells, then parity repair
    /// so the result is always solvable.
    pub fn shuffled<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Result<Self, EngineError> {
        Ok(ops::shuffle(Puzzle::solved(dim)?, rng))
    }

    /// Re-deal this puzzle (same dimension, fresh permutation).
    pub fn shuffle<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        ops::shuffle(self.clone(), rng)
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Cells in row-major order; `0` is the empty slot.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Row-major index of the empty slot.
    pub fn empty_index(&self) -> usize {
        self.cells
            .iter()
            .position(|&c| c == 0)
            .expect("puzzle invariant: exactly one empty slot")
    }

    /// Row-major index of `label`, if it is a valid tile label.
    pub fn tile_index(&self, label: u8) -> Option<usize> {
        if label == 0 || (label as usize) >= self.dim * self.dim {
            return None;
        }
        self.cells.iter().position(|&c| c == label)
    }

    /// Slide `label` into the empty slot. `changed == false` (and an
    /// untouched board) when the tile is not orthogonally adjacent to the
    /// empty slot; labels outside `1..=dim*dim-1` are an [`EngineError::InvalidMove`].
    pub fn slide(&self, label: u8) -> Result<SlideOutcome, EngineError> {
        ops::slide(self, label)
    }

    /// True iff a sequence of legal moves can reach the solved
    /// arrangement (inversion-parity rule).
    pub fn is_solvable(&self) -> bool {
        ops::is_solvable(self.dim, &self.cells)
    }

    /// True iff row-major reading yields `1, 2, ..., N²-1, 0`.
    pub fn is_solved(&self) -> bool {
        ops::is_solved(&self.cells)
    }

    /// Read-only snapshot for rendering.
    pub fn snapshot(&self) -> Grid {
        Grid::new(self.dim, self.cells.iter().map(|&c| c as u32).collect())
    }

    pub(crate) fn with_cells(&self, cells: Vec<u8>) -> Self {
        Puzzle {
            dim: self.dim,
            cells,
        }
    }
}

fn check_dim(dim: usize) -> Result<(), EngineError> {
    if (Puzzle::MIN_DIM..=Puzzle::MAX_DIM).contains(&dim) {
        Ok(())
    } else {
        Err(EngineError::InvalidGrid(format!(
            "dimension {dim} outside {}..={}",
            Puzzle::MIN_DIM,
            Puzzle::MAX_DIM
        )))
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.dim) {
            for &c in row {
                if c == 0 {
                    write!(f, "{:>4}", ".")?;
                } else {
                    write!(f, "{:>4}", c)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
