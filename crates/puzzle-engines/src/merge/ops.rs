use rand::Rng;

use super::state::{Board, Direction, MoveOutcome};
use super::tables::stores;

/// Slide/merge tiles in the given direction. No randomness.
pub(crate) fn shift(board: Board, direction: Direction) -> MoveOutcome {
    let (raw, delta) = match direction {
        Direction::Left | Direction::Right => shift_rows(board.raw(), direction),
        Direction::Up => {
            let (t, delta) = shift_rows(transpose(board.raw()), Direction::Left);
            (transpose(t), delta)
        }
        Direction::Down => {
            let (t, delta) = shift_rows(transpose(board.raw()), Direction::Right);
            (transpose(t), delta)
        }
    };
    MoveOutcome {
        board: Board::from_raw(raw),
        changed: raw != board.raw(),
        score_delta: delta,
    }
}

fn shift_rows(raw: u64, direction: Direction) -> (u64, u32) {
    let s = stores();
    let table = match direction {
        Direction::Left => &s.shift_left,
        Direction::Right => &s.shift_right,
        _ => unreachable!("column moves are transposed into row moves"),
    };
    let mut out = 0u64;
    let mut delta = 0u32;
    for row in 0..4 {
        let line = extract_line(raw, row);
        out |= (table[line as usize] as u64) << ((3 - row) * 16);
        delta += s.gained[line as usize];
    }
    (out, delta)
}

#[inline]
fn extract_line(raw: u64, row: usize) -> u16 {
    ((raw >> ((3 - row) * 16)) & 0xffff) as u16
}

// Credit to Nneonneo
pub(crate) fn transpose(x: u64) -> u64 {
    let a1 = x & 0xF0F0_0F0F_F0F0_0F0F;
    let a2 = x & 0x0000_F0F0_0000_F0F0;
    let a3 = x & 0x0F0F_0000_0F0F_0000;
    let a = a1 | (a2 << 12) | (a3 >> 12);
    let b1 = a & 0xFF00_FF00_00FF_00FF;
    let b2 = a & 0x00FF_00FF_0000_0000;
    let b3 = a & 0x0000_0000_FF00_FF00;
    b1 | (b2 >> 24) | (b3 << 24)
}

/// Exponent nibble at row-major index `idx` (0..16).
#[inline]
pub(crate) fn exponent(raw: u64, idx: usize) -> u8 {
    ((raw >> (60 - 4 * idx)) & 0xf) as u8
}

pub(crate) fn count_empty(raw: u64) -> u32 {
    let mut x = raw;
    x |= x >> 1;
    x |= x >> 2;
    x &= 0x1111_1111_1111_1111;
    16 - x.count_ones()
}

/// True if any cell is empty or any two orthogonally adjacent cells hold
/// equal nonzero values.
pub(crate) fn has_any_move(raw: u64) -> bool {
    if count_empty(raw) > 0 {
        return true;
    }
    for idx in 0..16 {
        let e = exponent(raw, idx);
        if idx % 4 < 3 && e == exponent(raw, idx + 1) {
            return true;
        }
        if idx < 12 && e == exponent(raw, idx + 4) {
            return true;
        }
    }
    false
}

/// Set one uniformly chosen empty cell to 2 (p = 0.9) or 4, or `None` when
/// the board is full.
pub(crate) fn with_spawn<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Option<Board> {
    let empty = count_empty(board.raw());
    if empty == 0 {
        return None;
    }
    let mut slot = rng.gen_range(0..empty);
    let exp: u64 = if rng.gen_range(0..10) < 9 { 1 } else { 2 };
    for idx in 0..16 {
        if exponent(board.raw(), idx) != 0 {
            continue;
        }
        if slot == 0 {
            return Some(Board::from_raw(board.raw() | (exp << (60 - 4 * idx))));
        }
        slot -= 1;
    }
    None
}
