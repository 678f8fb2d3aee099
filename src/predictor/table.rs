//! Types for implementing a table of predictors.

use crate::config::MAX_INDEX_BITS;
use crate::history::mask;
use crate::predictor::counter::*;

/// A table of `2^bits` [SaturatingCounter]s.
///
/// Every access is masked with the width of the table, so any value can be
/// used as an index.
#[derive(Clone, Debug)]
pub struct CounterTable {
    data: Vec<SaturatingCounter>,
    bits: u32,
}
impl CounterTable {
    /// Create a table with `2^bits` entries, each holding `init`.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is larger than [MAX_INDEX_BITS].
    pub fn new(bits: u32, init: u8) -> Self {
        assert!(bits <= MAX_INDEX_BITS,
            "table width {} exceeds {}", bits, MAX_INDEX_BITS);
        Self {
            data: vec![SaturatingCounter::new(init); 1 << bits],
            bits,
        }
    }

    /// Returns the width of an index into this table.
    pub fn bits(&self) -> u32 { self.bits }

    /// Returns the number of bits of state held by this table.
    pub fn storage_bits(&self) -> usize { self.data.len() * 2 }

    pub fn iter(&self) -> impl Iterator<Item = &SaturatingCounter> {
        self.data.iter()
    }

    /// Returns the number of entries in the table.
    pub fn size(&self) -> usize { self.data.len() }

    /// Returns a bitmask corresponding to the number of entries in the table.
    pub fn index_mask(&self) -> u32 { mask(self.bits) }

    pub fn get_entry(&self, idx: u32) -> &SaturatingCounter {
        &self.data[(idx & self.index_mask()) as usize]
    }

    pub fn get_entry_mut(&mut self, idx: u32) -> &mut SaturatingCounter {
        let index = (idx & self.index_mask()) as usize;
        &mut self.data[index]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accesses_wrap_through_the_mask() {
        let mut t = CounterTable::new(3, 1);
        assert_eq!(t.size(), 8);
        assert_eq!(t.index_mask(), 0b111);
        t.get_entry_mut(0b1_0101).increment();
        assert_eq!(t.get_entry(0b101).value(), 2);
        assert!(t.iter().filter(|c| c.value() == 1).count() == 7);
    }

    #[test]
    fn zero_width_table_has_one_entry() {
        let mut t = CounterTable::new(0, 2);
        assert_eq!(t.size(), 1);
        t.get_entry_mut(0xdead_beef).decrement();
        assert_eq!(t.get_entry(7).value(), 1);
        assert_eq!(t.storage_bits(), 2);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn oversized_table_is_rejected() {
        CounterTable::new(64, 1);
    }
}
