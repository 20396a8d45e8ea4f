use rand::seq::SliceRandom;
use rand::Rng;

use super::state::{Puzzle, SlideOutcome};
use crate::grid::EngineError;

/// Uniform Fisher-Yates shuffle of all cells (the empty slot moves with
/// the rest), then parity repair: an unsolvable deal gets the first two
/// nonzero cells in reading order swapped. A single transposition flips
/// the inversion parity and the empty slot stays put, so the repaired
/// board is always solvable.
pub(crate) fn shuffle<R: Rng + ?Sized>(puzzle: Puzzle, rng: &mut R) -> Puzzle {
    let mut cells = puzzle.cells().to_vec();
    cells.shuffle(rng);
    if !is_solvable(puzzle.dim(), &cells) {
        parity_repair(&mut cells);
    }
    puzzle.with_cells(cells)
}

fn parity_repair(cells: &mut [u8]) {
    let mut nonzero = cells.iter().enumerate().filter(|(_, &c)| c != 0);
    let a = nonzero.next().map(|(i, _)| i);
    let b = nonzero.next().map(|(i, _)| i);
    if let (Some(a), Some(b)) = (a, b) {
        cells.swap(a, b);
    }
}

/// Pairs of nonzero labels out of ascending order in row-major reading.
pub(crate) fn inversions(cells: &[u8]) -> usize {
    let mut count = 0;
    for (i, &a) in cells.iter().enumerate() {
        if a == 0 {
            continue;
        }
        for &b in &cells[i + 1..] {
            if b != 0 && a > b {
                count += 1;
            }
        }
    }
    count
}

/// Inversion-parity solvability rule.
///
/// Vertical moves of the empty slot change the inversion count by an odd
/// amount exactly when the board width is even, so the conserved quantity
/// differs by parity of N:
/// - N odd: solvable iff inversions is even.
/// - N even: solvable iff inversions plus the empty slot's row distance
///   from the bottom row is even (the solved grid has both at zero).
pub(crate) fn is_solvable(dim: usize, cells: &[u8]) -> bool {
    let inv = inversions(cells);
    if dim % 2 == 1 {
        inv % 2 == 0
    } else {
        let empty = cells
            .iter()
            .position(|&c| c == 0)
            .expect("puzzle invariant: exactly one empty slot");
        let rows_from_bottom = dim - 1 - empty / dim;
        (inv + rows_from_bottom) % 2 == 0
    }
}

pub(crate) fn is_solved(cells: &[u8]) -> bool {
    let last = cells.len() - 1;
    cells[last] == 0 && cells[..last].iter().enumerate().all(|(i, &c)| c as usize == i + 1)
}

pub(crate) fn slide(puzzle: &Puzzle, label: u8) -> Result<SlideOutcome, EngineError> {
    let dim = puzzle.dim();
    let tile = puzzle.tile_index(label).ok_or_else(|| {
        EngineError::InvalidMove(format!("no tile labeled {label} on a {dim}x{dim} board"))
    })?;
    let empty = puzzle.empty_index();
    let (tr, tc) = (tile / dim, tile % dim);
    let (er, ec) = (empty / dim, empty % dim);
    let adjacent = (tr == er && tc.abs_diff(ec) == 1) || (tc == ec && tr.abs_diff(er) == 1);
    if !adjacent {
        return Ok(SlideOutcome {
            puzzle: puzzle.clone(),
            changed: false,
        });
    }
    let mut cells = puzzle.cells().to_vec();
    cells.swap(tile, empty);
    Ok(SlideOutcome {
        puzzle: puzzle.with_cells(cells),
        changed: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn puzzle(dim: usize, cells: &[u8]) -> Puzzle {
        Puzzle::from_cells(dim, cells.to_vec()).unwrap()
    }

    #[test]
    fn inversion_counting() {
        assert_eq!(inversions(&[1, 2, 3, 4, 5, 6, 7, 8, 0]), 0);
        assert_eq!(inversions(&[2, 1, 3, 4, 5, 6, 7, 8, 0]), 1);
        // the empty slot never participates
        assert_eq!(inversions(&[1, 0, 2, 3, 4, 5, 6, 7, 8]), 0);
        assert_eq!(inversions(&[8, 7, 6, 5, 4, 3, 2, 1, 0]), 28);
    }

    #[test]
    fn solvability_odd_dim() {
        assert!(puzzle(3, &[1, 2, 3, 4, 5, 6, 7, 8, 0]).is_solvable());
        // one transposition flips it
        assert!(!puzzle(3, &[2, 1, 3, 4, 5, 6, 7, 8, 0]).is_solvable());
        // empty slot position is irrelevant for odd N
        assert!(puzzle(3, &[0, 1, 2, 3, 4, 5, 6, 7, 8]).is_solvable());
    }

    #[test]
    fn solvability_even_dim() {
        let solved: Vec<u8> = (1..16).chain([0]).collect();
        assert!(puzzle(4, &solved).is_solvable());
        // Sam Loyd's 14-15 swap is the canonical unsolvable deal
        let mut loyd = solved.clone();
        loyd.swap(13, 14);
        assert!(!puzzle(4, &loyd).is_solvable());
        // moving the empty slot up one row keeps solvability (the slide
        // that does it changes inversions by an odd amount too)
        let shifted = puzzle(4, &solved).slide(12).unwrap();
        assert!(shifted.changed);
        assert!(shifted.puzzle.is_solvable());
    }

    #[test]
    fn shuffle_repairs_parity_deterministically() {
        let mut loyd: Vec<u8> = (1..16).chain([0]).collect();
        loyd.swap(13, 14);
        assert!(!is_solvable(4, &loyd));
        parity_repair(&mut loyd);
        assert!(is_solvable(4, &loyd));
        // repair touched exactly the first two cells in reading order
        assert_eq!(&loyd[..2], &[2, 1]);
    }

    #[test]
    fn shuffled_deals_are_valid_permutations() {
        let mut rng = StdRng::seed_from_u64(9);
        for dim in 3..=5 {
            let p = Puzzle::shuffled(dim, &mut rng).unwrap();
            assert!(p.is_solvable());
            // from_cells re-validates the permutation invariant
            assert!(Puzzle::from_cells(dim, p.cells().to_vec()).is_ok());
        }
    }

    #[test]
    fn slide_requires_orthogonal_adjacency() {
        // . 1 2
        // 3 4 5
        // 6 7 8
        let p = puzzle(3, &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        // diagonal neighbor
        let out = p.slide(4).unwrap();
        assert!(!out.changed);
        assert_eq!(out.puzzle, p);
        // two cells away in the same row
        assert!(!p.slide(2).unwrap().changed);
        // two cells away in the same column
        assert!(!p.slide(6).unwrap().changed);
        // orthogonal neighbors move
        assert!(p.slide(1).unwrap().changed);
        assert!(p.slide(3).unwrap().changed);
    }

    #[test]
    fn slide_swaps_tile_and_empty() {
        let p = Puzzle::solved(3).unwrap();
        let out = p.slide(8).unwrap();
        assert!(out.changed);
        assert_eq!(out.puzzle.cells(), &[1, 2, 3, 4, 5, 6, 7, 0, 8]);
        // values are permuted, never altered
        let mut sorted: Vec<u8> = out.puzzle.cells().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..9).collect::<Vec<u8>>());
    }

    #[test]
    fn slide_rejects_unknown_labels() {
        let p = Puzzle::solved(3).unwrap();
        assert!(matches!(p.slide(0), Err(EngineError::InvalidMove(_))));
        assert!(matches!(p.slide(9), Err(EngineError::InvalidMove(_))));
    }

    #[test]
    fn solved_is_exact() {
        assert!(Puzzle::solved(5).unwrap().is_solved());
        // any single transposition breaks it
        let mut cells: Vec<u8> = (1..9).chain([0]).collect();
        cells.swap(0, 1);
        assert!(!puzzle(3, &cells).is_solved());
        // empty slot anywhere but last is not solved
        assert!(!puzzle(3, &[0, 1, 2, 3, 4, 5, 6, 7, 8]).is_solved());
    }

    #[test]
    fn moves_invert_cleanly() {
        let mut rng = StdRng::seed_from_u64(11);
        let start = Puzzle::shuffled(4, &mut rng).unwrap();
        let mut p = start.clone();
        let mut played = Vec::new();
        // walk the empty slot around with whatever neighbor sits above or
        // beside it
        for step in 0..40 {
            let empty = p.empty_index();
            let candidate = if step % 2 == 0 && empty >= 4 {
                p.cells()[empty - 4]
            } else if empty % 4 > 0 {
                p.cells()[empty - 1]
            } else {
                p.cells()[empty + 1]
            };
            let out = p.slide(candidate).unwrap();
            assert!(out.changed);
            played.push(candidate);
            p = out.puzzle;
        }
        // the inverse of a slide is sliding the same tile back
        for &label in played.iter().rev() {
            let out = p.slide(label).unwrap();
            assert!(out.changed);
            p = out.puzzle;
        }
        assert_eq!(p, start);
    }
}
