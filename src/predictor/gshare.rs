//! Implementation of the "gshare" predictor.

use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// A table of [SaturatingCounter]s indexed by global history XOR'ed with
/// the program counter.
///
/// See "Combining Branch Predictors" (McFarling, 1993).
#[derive(Clone, Debug)]
pub struct GsharePredictor {
    /// Global history register
    ghist: ShiftRegister,

    /// Table of counters, initialized to 'weakly not-taken'
    pht: CounterTable,
}
impl GsharePredictor {
    /// # Panics
    ///
    /// Panics if `ghistory_bits` is larger than
    /// [MAX_INDEX_BITS](crate::config::MAX_INDEX_BITS). Use
    /// [BranchPredictor::new] to get an error instead.
    pub fn new(ghistory_bits: u32) -> Self {
        Self {
            ghist: ShiftRegister::new(ghistory_bits),
            pht: CounterTable::new(ghistory_bits, SaturatingCounter::WEAK_N),
        }
    }

    /// Form an index into the table from some program counter value.
    pub fn index(&self, pc: u32) -> u32 {
        let m = mask(self.ghist.width());
        (self.ghist.value() & m) ^ (pc & m)
    }

    pub fn ghist(&self) -> u32 { self.ghist.value() }
    pub fn table(&self) -> &CounterTable { &self.pht }
}

impl DirectionPredictor for GsharePredictor {
    fn name(&self) -> &'static str { "GsharePredictor" }

    fn predict(&self, pc: u32) -> Outcome {
        self.pht.get_entry(self.index(pc)).predict()
    }

    fn train(&mut self, pc: u32, outcome: Outcome) {
        let idx = self.index(pc);
        self.pht.get_entry_mut(idx).update(outcome);
        self.ghist.push(outcome);
    }

    fn storage_bits(&self) -> usize {
        self.pht.storage_bits() + self.ghist.width() as usize
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    #[should_panic(expected = "exceeds")]
    fn oversized_history_is_rejected() {
        GsharePredictor::new(64);
    }

    #[test]
    fn index_folds_history_into_pc() {
        let mut p = GsharePredictor::new(4);
        p.train(0, Outcome::T);
        p.train(0, Outcome::N);
        p.train(0, Outcome::T);
        assert_eq!(p.ghist(), 0b101);
        assert_eq!(p.index(0xffff_fff0), 0b0101);
        assert_eq!(p.index(0b0110), 0b0011);
    }

    #[test]
    fn three_taken_updates_saturate() {
        // With no history bits, every branch shares entry 0
        let mut p = GsharePredictor::new(0);
        assert_eq!(p.table().get_entry(0).value(), 1);
        for _ in 0..3 {
            p.train(0x40, Outcome::T);
        }
        assert_eq!(p.table().get_entry(0).value(), 3);
        p.train(0x40, Outcome::T);
        assert_eq!(p.table().get_entry(0).value(), 3);
        assert_eq!(p.predict(0x40), Outcome::T);
    }
}
