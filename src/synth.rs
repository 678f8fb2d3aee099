//! Generating synthetic branch traces.

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::Outcome;
use crate::trace::BranchRecord;

/// A pre-determined pattern of outcomes associated with a conditional branch.
#[derive(Clone, Debug, PartialEq)]
pub enum BranchPattern {
    /// A branch whose outcome is always 'taken'.
    AlwaysTaken,

    /// A branch whose outcome is always 'not-taken'.
    NeverTaken,

    /// A branch whose outcome is only periodically "taken".
    /// Otherwise, the branch is "not-taken" by default.
    TakenPeriodic(usize),

    /// A branch whose outcome is only periodically "not-taken".
    /// Otherwise, the branch is "taken" by default.
    NotTakenPeriodic(usize),

    /// A branch with an arbitrary repeating pattern of outcomes.
    Pattern(Vec<Outcome>),

    /// A branch which is taken with some probability.
    Random(f64),

    /// A branch which repeats the most recent outcome of another branch
    /// (identified by its position in the program).
    Correlated(usize),
}

#[derive(Clone, Debug)]
struct BranchSite {
    pc: u32,
    pattern: BranchPattern,
    ctr: usize,
    last: Outcome,
}

/// A straight-line program of conditional branches, executed in a loop.
///
/// ```text
/// let mut p = SyntheticProgram::new(0x1000_0000, 4, 0);
/// p.add_branch(BranchPattern::TakenPeriodic(4));
/// let trace = p.simulate_for(64);
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticProgram {
    sites: Vec<BranchSite>,

    /// State tracking the program counter value during assembly.
    cursor: u32,

    /// Distance between consecutive branches.
    stride: u32,

    rng: StdRng,
}
impl SyntheticProgram {
    /// Create a new program. Branches are placed `stride` bytes apart
    /// starting from `base`, and random outcomes are drawn from a generator
    /// seeded with `seed`.
    pub fn new(base: u32, stride: u32, seed: u64) -> Self {
        Self {
            sites: Vec::new(),
            cursor: base,
            stride,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Append a conditional branch to the program. Returns its position.
    pub fn add_branch(&mut self, pattern: BranchPattern) -> usize {
        let pc = self.cursor;
        self.cursor = self.cursor.wrapping_add(self.stride);
        self.sites.push(BranchSite { pc, pattern, ctr: 0, last: Outcome::N });
        self.sites.len() - 1
    }

    /// Increment the program counter by some value.
    pub fn pad(&mut self, len: u32) {
        self.cursor = self.cursor.wrapping_add(len);
    }

    pub fn num_branches(&self) -> usize { self.sites.len() }

    /// Return the program counter value of some branch.
    pub fn pc(&self, site: usize) -> u32 { self.sites[site].pc }

    /// Generate the outcome for the next execution of some branch.
    fn outcome(&mut self, site: usize) -> Outcome {
        let ctr = self.sites[site].ctr;
        match &self.sites[site].pattern {
            BranchPattern::AlwaysTaken => Outcome::T,
            BranchPattern::NeverTaken => Outcome::N,
            BranchPattern::TakenPeriodic(p) => {
                let p = (*p).max(1);
                Outcome::from(ctr % p == p - 1)
            },
            BranchPattern::NotTakenPeriodic(p) => {
                let p = (*p).max(1);
                Outcome::from(ctr % p != p - 1)
            },
            BranchPattern::Pattern(pat) => {
                if pat.is_empty() { Outcome::N } else { pat[ctr % pat.len()] }
            },
            BranchPattern::Random(p) => {
                let p = if p.is_nan() { 0.0 } else { (*p).clamp(0.0, 1.0) };
                Outcome::from(self.rng.gen_bool(p))
            },
            BranchPattern::Correlated(other) => {
                self.sites.get(*other).map_or(Outcome::N, |s| s.last)
            },
        }
    }

    /// Run the program for `num_branches` dynamic branches.
    pub fn simulate_for(&mut self, num_branches: usize) -> Vec<BranchRecord> {
        let mut res = Vec::with_capacity(num_branches);
        if self.sites.is_empty() {
            return res;
        }
        for iter in 0..num_branches {
            let cur = iter % self.sites.len();
            let outcome = self.outcome(cur);
            let site = &mut self.sites[cur];
            site.ctr += 1;
            site.last = outcome;
            res.push(BranchRecord::new(site.pc, outcome));
        }
        res
    }
}
