use std::sync::OnceLock;

/// Precomputed results for every possible 4-cell line (16-bit packed).
///
/// Shifting a row or column depends only on its 4 nibbles, so we tabulate
/// the left and right results and the score gained (sum of post-doubling
/// merged values) for each of the 2^16 lines. Up/down reuse the left/right
/// tables after transposing the board.
pub(crate) struct Stores {
    pub(crate) shift_left: Box<[u16]>,
    pub(crate) shift_right: Box<[u16]>,
    pub(crate) gained: Box<[u32]>,
}

const LINE_TABLE_SIZE: usize = 0x1_0000;

static STORES: OnceLock<Stores> = OnceLock::new();

#[inline]
pub(crate) fn stores() -> &'static Stores {
    STORES.get_or_init(create_stores)
}

fn create_stores() -> Stores {
    let mut shift_left = vec![0u16; LINE_TABLE_SIZE];
    let mut shift_right = vec![0u16; LINE_TABLE_SIZE];
    let mut gained = vec![0u32; LINE_TABLE_SIZE];

    for idx in 0..LINE_TABLE_SIZE {
        let line = idx as u16;
        let (left, delta) = collapse_left(unpack(line));
        shift_left[idx] = pack(left);
        // Mirroring the line mirrors the move; merged pairs (and so the
        // delta) are identical either way.
        let (right_rev, _) = collapse_left(reverse(unpack(line)));
        shift_right[idx] = pack(reverse(right_rev));
        gained[idx] = delta;
    }

    Stores {
        shift_left: shift_left.into_boxed_slice(),
        shift_right: shift_right.into_boxed_slice(),
        gained: gained.into_boxed_slice(),
    }
}

/// Nibble exponents of a packed line, leftmost cell first.
fn unpack(line: u16) -> [u8; 4] {
    [
        ((line >> 12) & 0xf) as u8,
        ((line >> 8) & 0xf) as u8,
        ((line >> 4) & 0xf) as u8,
        (line & 0xf) as u8,
    ]
}

fn pack(cells: [u8; 4]) -> u16 {
    ((cells[0] as u16) << 12) | ((cells[1] as u16) << 8) | ((cells[2] as u16) << 4) | cells[3] as u16
}

fn reverse(cells: [u8; 4]) -> [u8; 4] {
    [cells[3], cells[2], cells[1], cells[0]]
}

/// Compress nonzero cells to the left preserving order, then merge equal
/// neighbors scanning from the left edge. A cell produced by a merge never
/// merges again within the same move.
fn collapse_left(cells: [u8; 4]) -> ([u8; 4], u32) {
    let mut out = [0u8; 4];
    let mut n = 0;
    for c in cells {
        if c != 0 {
            out[n] = c;
            n += 1;
        }
    }
    let mut delta = 0u32;
    let mut i = 0;
    while i + 1 < n {
        // Exponent 15 is the nibble ceiling; a pair of 32768s stays put.
        if out[i] == out[i + 1] && out[i] < 0xf {
            out[i] += 1;
            delta += 1u32 << out[i];
            for j in i + 1..n - 1 {
                out[j] = out[j + 1];
            }
            out[n - 1] = 0;
            n -= 1;
        }
        i += 1;
    }
    (out, delta)
}
