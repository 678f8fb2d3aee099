//! Implementation of a "tournament" predictor.

use crate::Outcome;
use crate::history::*;
use crate::predictor::*;

/// Strategy used to form an index into the global pattern and choice tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlobalIndex {
    /// Global history only.
    History,

    /// Global history XOR'ed with the program counter (as in gshare).
    PcXorHistory,
}

/// Container for the votes considered by a [TournamentPredictor].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TournamentVotes {
    /// Outcome predicted by the local component
    pub local: Outcome,

    /// Outcome predicted by the global component
    pub global: Outcome,

    /// 'true' when the choice table selects the global component
    pub use_global: bool,
}
impl TournamentVotes {
    /// The outcome selected by the choice table.
    pub fn outcome(&self) -> Outcome {
        if self.use_global { self.global } else { self.local }
    }
}

/// A local predictor and a global predictor, arbitrated by a table of
/// choice counters indexed by global context.
///
/// See "Combining Branch Predictors" (McFarling, 1993) and the Alpha 21264
/// branch predictor (Kessler, 1999).
///
/// Choice counters below 2 select the local component, and counters of 2 or
/// more select the global component. A choice counter only moves when
/// exactly one of the components was correct.
#[derive(Clone, Debug)]
pub struct TournamentPredictor {
    index_strat: GlobalIndex,

    /// Global history register
    ghist: ShiftRegister,

    /// Per-branch local history
    lht: LocalHistoryTable,

    /// Local pattern table, indexed by local history
    local_pht: CounterTable,

    /// Global pattern table
    global_pht: CounterTable,

    /// Choice table, initialized to 'weakly global'
    choice_pht: CounterTable,
}
impl TournamentPredictor {
    /// Widths used by [TournamentPredictor::custom].
    pub const CUSTOM_GHISTORY_BITS: u32 = 13;
    pub const CUSTOM_LHISTORY_BITS: u32 = 11;
    pub const CUSTOM_PC_INDEX_BITS: u32 = 11;

    pub fn new(ghistory_bits: u32, lhistory_bits: u32, pc_index_bits: u32)
        -> Self
    {
        Self::with_index(GlobalIndex::History, ghistory_bits, lhistory_bits,
            pc_index_bits)
    }

    /// A tournament predictor whose global component is indexed like
    /// gshare, sized to fit in about 59 kbits.
    pub fn custom() -> Self {
        Self::with_index(GlobalIndex::PcXorHistory,
            Self::CUSTOM_GHISTORY_BITS,
            Self::CUSTOM_LHISTORY_BITS,
            Self::CUSTOM_PC_INDEX_BITS,
        )
    }

    /// # Panics
    ///
    /// Panics if any width is larger than
    /// [MAX_INDEX_BITS](crate::config::MAX_INDEX_BITS). Use
    /// [BranchPredictor::new] to get an error instead.
    pub fn with_index(index_strat: GlobalIndex, ghistory_bits: u32,
        lhistory_bits: u32, pc_index_bits: u32) -> Self
    {
        Self {
            index_strat,
            ghist: ShiftRegister::new(ghistory_bits),
            lht: LocalHistoryTable::new(pc_index_bits, lhistory_bits),
            local_pht: CounterTable::new(lhistory_bits,
                SaturatingCounter::WEAK_N),
            global_pht: CounterTable::new(ghistory_bits,
                SaturatingCounter::WEAK_N),
            choice_pht: CounterTable::new(ghistory_bits,
                SaturatingCounter::WEAK_T),
        }
    }

    /// Form an index into the global pattern and choice tables.
    pub fn global_index(&self, pc: u32) -> u32 {
        let m = mask(self.ghist.width());
        match self.index_strat {
            GlobalIndex::History => self.ghist.value() & m,
            GlobalIndex::PcXorHistory => (self.ghist.value() ^ pc) & m,
        }
    }

    /// Form an index into the local pattern table.
    pub fn local_index(&self, pc: u32) -> u32 {
        self.lht.history(pc) & self.local_pht.index_mask()
    }

    /// Read the votes from both components and the choice table.
    pub fn votes(&self, pc: u32) -> TournamentVotes {
        let gidx = self.global_index(pc);
        let lidx = self.local_index(pc);
        TournamentVotes {
            local: self.local_pht.get_entry(lidx).predict(),
            global: self.global_pht.get_entry(gidx).predict(),
            use_global: self.choice_pht.get_entry(gidx).value()
                >= SaturatingCounter::WEAK_T,
        }
    }

    pub fn ghist(&self) -> u32 { self.ghist.value() }
    pub fn local_history(&self, pc: u32) -> u32 { self.lht.history(pc) }
    pub fn local_table(&self) -> &CounterTable { &self.local_pht }
    pub fn global_table(&self) -> &CounterTable { &self.global_pht }
    pub fn choice_table(&self) -> &CounterTable { &self.choice_pht }
}

impl DirectionPredictor for TournamentPredictor {
    fn name(&self) -> &'static str {
        match self.index_strat {
            GlobalIndex::History => "TournamentPredictor",
            GlobalIndex::PcXorHistory => "CustomTournamentPredictor",
        }
    }

    fn predict(&self, pc: u32) -> Outcome {
        self.votes(pc).outcome()
    }

    fn train(&mut self, pc: u32, outcome: Outcome) {
        let gidx = self.global_index(pc);
        let lidx = self.local_index(pc);

        // Both votes are sampled before any table changes
        let votes = self.votes(pc);
        let global_hit = votes.global == outcome;
        let local_hit  = votes.local == outcome;

        let choice = self.choice_pht.get_entry_mut(gidx);
        match (global_hit, local_hit) {
            (true, false) => choice.increment(),
            (false, true) => choice.decrement(),
            _ => {},
        }

        self.global_pht.get_entry_mut(gidx).update(outcome);
        self.local_pht.get_entry_mut(lidx).update(outcome);

        self.lht.push(pc, outcome);
        self.ghist.push(outcome);
    }

    fn storage_bits(&self) -> usize {
        self.local_pht.storage_bits()
            + self.global_pht.storage_bits()
            + self.choice_pht.storage_bits()
            + self.lht.size() * self.local_pht.bits() as usize
            + self.ghist.width() as usize
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn initial_state_leans_global() {
        let p = TournamentPredictor::new(2, 2, 2);
        let votes = p.votes(0x10);
        assert!(votes.use_global);
        assert_eq!(votes.global, Outcome::N);
        assert_eq!(p.predict(0x10), Outcome::N);
    }

    #[test]
    fn choice_is_untouched_when_both_agree() {
        let mut p = TournamentPredictor::new(2, 2, 2);
        // Both components start at 'weakly not-taken' and are both correct
        p.train(0, Outcome::N);
        assert_eq!(p.choice_table().get_entry(0).value(), 2);
        // ...and both wrong
        p.train(0, Outcome::T);
        assert_eq!(p.choice_table().get_entry(0).value(), 2);
    }

    #[test]
    fn histories_are_masked() {
        let mut p = TournamentPredictor::new(2, 3, 1);
        for _ in 0..5 {
            p.train(0b11, Outcome::T);
        }
        assert_eq!(p.ghist(), 0b11);
        assert_eq!(p.local_history(0b1), 0b111);
        assert_eq!(p.local_history(0b0), 0);
    }

    #[test]
    fn custom_index_mixes_pc() {
        let p = TournamentPredictor::custom();
        assert_eq!(p.global_index(0xabcd), 0xabcd & mask(13));
        assert_eq!(p.name(), "CustomTournamentPredictor");
        // 2^13 x 2 (global) + 2^13 x 2 (choice) + 2^11 x 2 (local)
        // + 2^11 x 11 (local history) + 13 (global history)
        assert_eq!(p.storage_bits(), 59392 + 13);
    }
}
