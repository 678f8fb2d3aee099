//! Branch history registers.

use bitvec::prelude::*;
use crate::Outcome;
use crate::config::MAX_INDEX_BITS;

/// Return a mask with the low `width` bits set.
///
/// A width of zero yields an empty mask, and any width of 32 or more yields
/// a mask with every bit set.
pub fn mask(width: u32) -> u32 {
    1u32.checked_shl(width).map_or(u32::MAX, |bit| bit - 1)
}

/// A fixed-width shift register holding the most recent branch outcomes.
///
/// The newest outcome is always the least-significant bit. Bits shifted
/// beyond `width` are discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShiftRegister {
    data: u32,
    width: u32,
}
impl ShiftRegister {
    /// Create a register with the specified width in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(width: u32) -> Self {
        Self { data: 0, width }
    }

    pub fn width(&self) -> u32 { self.width }

    /// Return the contents of the register.
    pub fn value(&self) -> u32 { self.data }

    /// Shift an outcome into the low bit of the register.
    pub fn push(&mut self, outcome: Outcome) {
        self.data = ((self.data << 1) | outcome.is_taken() as u32)
            & mask(self.width);
    }
}

/// A table of per-branch local history registers.
///
/// Rows are selected with the low `row_bits` bits of the program counter and
/// each row holds `history_bits` bits of local history.
#[derive(Clone, Debug)]
pub struct LocalHistoryTable {
    rows: Vec<ShiftRegister>,
    row_mask: u32,
}
impl LocalHistoryTable {
    /// # Panics
    ///
    /// Panics if `row_bits` is larger than [MAX_INDEX_BITS].
    pub fn new(row_bits: u32, history_bits: u32) -> Self {
        assert!(row_bits <= MAX_INDEX_BITS,
            "history table width {} exceeds {}", row_bits, MAX_INDEX_BITS);
        Self {
            rows: vec![ShiftRegister::new(history_bits); 1 << row_bits],
            row_mask: mask(row_bits),
        }
    }

    /// Returns the number of rows in the table.
    pub fn size(&self) -> usize { self.rows.len() }

    /// Return the row index associated with a program counter value.
    pub fn row(&self, pc: u32) -> usize {
        (pc & self.row_mask) as usize
    }

    /// Return the local history associated with a program counter value.
    pub fn history(&self, pc: u32) -> u32 {
        self.rows[self.row(pc)].value()
    }

    /// Shift an outcome into the history associated with a program counter
    /// value.
    pub fn push(&mut self, pc: u32, outcome: Outcome) {
        let row = self.row(pc);
        self.rows[row].push(outcome);
    }
}

/// A global history register with one bit per outcome.
///
/// The oldest outcome lives at index 0 and the newest outcome at the tail.
/// Every bit is initialized to zero ('not-taken').
#[derive(Clone, Debug)]
pub struct HistoryRegister {
    data: BitVec<usize, Lsb0>,
}

// NOTE: The newest outcome is printed in the rightmost position.
impl std::fmt::Display for HistoryRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let x: String = self.data.iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .collect();
        write!(f, "{}", x)
    }
}

impl HistoryRegister {
    /// Create a register with the specified length in bits.
    pub fn new(len: usize) -> Self {
        Self { data: bitvec![usize, Lsb0; 0; len] }
    }

    pub fn len(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }
    pub fn data(&self) -> &BitSlice<usize, Lsb0> { &self.data }

    /// Return the outcome recorded at some position.
    pub fn get(&self, idx: usize) -> Outcome {
        self.data[idx].into()
    }

    /// Iterate over the history as signed inputs (`+1` for taken and `-1`
    /// for not-taken), oldest first.
    pub fn signs(&self) -> impl Iterator<Item = i32> + '_ {
        self.data.iter().by_vals().map(|b| Outcome::from(b).sign())
    }

    /// Drop the oldest outcome and append a new one at the tail.
    pub fn push(&mut self, outcome: Outcome) {
        let len = self.data.len();
        if len == 0 {
            return;
        }
        self.data.rotate_left(1);
        self.data.set(len - 1, outcome.into());
    }
}
