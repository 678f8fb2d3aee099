//! Implementation of a saturating counter.

use crate::Outcome;

/// A 2-bit saturating counter used to follow the behavior of a branch.
///
/// The counter holds a value in `[0, 3]`. Values above 1 predict 'taken'.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaturatingCounter {
    ctr: u8,
}
impl SaturatingCounter {
    /// The largest value held by the counter.
    pub const MAX: u8 = 3;

    /// Strongly not-taken
    pub const STRONG_N: u8 = 0;
    /// Weakly not-taken
    pub const WEAK_N: u8 = 1;
    /// Weakly taken
    pub const WEAK_T: u8 = 2;
    /// Strongly taken
    pub const STRONG_T: u8 = 3;

    /// Create a counter with some initial value. Values beyond the range of
    /// the counter are clamped.
    pub fn new(init: u8) -> Self {
        Self { ctr: init.min(Self::MAX) }
    }

    /// Return the current value of the counter.
    pub fn value(&self) -> u8 { self.ctr }

    pub fn increment(&mut self) {
        if self.ctr < Self::MAX {
            self.ctr += 1;
        }
    }

    pub fn decrement(&mut self) {
        self.ctr = self.ctr.saturating_sub(1);
    }

    /// Return the current predicted direction.
    pub fn predict(&self) -> Outcome {
        Outcome::from(self.ctr > Self::WEAK_N)
    }

    /// Move the counter towards the resolved outcome.
    pub fn update(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::T => self.increment(),
            Outcome::N => self.decrement(),
        }
    }
}
