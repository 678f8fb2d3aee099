//! Implementations of different branch predictors.

pub mod table;
pub mod simple;
pub mod counter;
pub mod gshare;
pub mod tournament;
pub mod perceptron;

pub use table::*;
pub use simple::*;
pub use counter::*;
pub use gshare::*;
pub use tournament::*;
pub use perceptron::*;

use crate::Outcome;
use crate::config::*;
use crate::error::ConfigError;

/// Interface to a predictor which guesses the direction of a conditional
/// branch and is later told the resolved outcome.
///
/// Callers are expected to alternate between [DirectionPredictor::predict]
/// and [DirectionPredictor::train] for each branch in program order, passing
/// the same program counter value to both.
pub trait DirectionPredictor {
    fn name(&self) -> &'static str;

    /// Return the predicted outcome for the branch at `pc`.
    /// This never changes the state of the predictor.
    fn predict(&self, pc: u32) -> Outcome;

    /// Update the internal state of the predictor with the resolved outcome
    /// of the branch at `pc`.
    fn train(&mut self, pc: u32, outcome: Outcome);

    /// Returns the number of bits of state used by the predictor.
    fn storage_bits(&self) -> usize;
}

/// A predictor built from some [PredictorConfig].
///
/// Exactly one scheme is constructed, and only the tables used by that
/// scheme are allocated.
#[derive(Clone, Debug)]
pub enum BranchPredictor {
    Static(TakenPredictor),
    Gshare(GsharePredictor),
    Tournament(TournamentPredictor),
    Custom(TournamentPredictor),
    Perceptron(PerceptronPredictor),
}
impl BranchPredictor {
    pub fn new(cfg: &PredictorConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(match cfg.scheme {
            Scheme::Static => Self::Static(TakenPredictor),
            Scheme::Gshare => Self::Gshare(
                GsharePredictor::new(cfg.ghistory_bits)
            ),
            Scheme::Tournament => Self::Tournament(TournamentPredictor::new(
                cfg.ghistory_bits, cfg.lhistory_bits, cfg.pc_index_bits
            )),
            Scheme::Custom => Self::Custom(TournamentPredictor::custom()),
            Scheme::Perceptron => Self::Perceptron(
                PerceptronConfig::default().build()?
            ),
        })
    }

    /// Return the scheme implemented by this predictor.
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::Static(_) => Scheme::Static,
            Self::Gshare(_) => Scheme::Gshare,
            Self::Tournament(_) => Scheme::Tournament,
            Self::Custom(_) => Scheme::Custom,
            Self::Perceptron(_) => Scheme::Perceptron,
        }
    }

    fn inner(&self) -> &dyn DirectionPredictor {
        match self {
            Self::Static(p) => p,
            Self::Gshare(p) => p,
            Self::Tournament(p) | Self::Custom(p) => p,
            Self::Perceptron(p) => p,
        }
    }
}

impl DirectionPredictor for BranchPredictor {
    fn name(&self) -> &'static str { self.inner().name() }

    fn predict(&self, pc: u32) -> Outcome {
        match self {
            Self::Static(p) => p.predict(pc),
            Self::Gshare(p) => p.predict(pc),
            Self::Tournament(p) | Self::Custom(p) => p.predict(pc),
            Self::Perceptron(p) => p.predict(pc),
        }
    }

    fn train(&mut self, pc: u32, outcome: Outcome) {
        match self {
            Self::Static(p) => p.train(pc, outcome),
            Self::Gshare(p) => p.train(pc, outcome),
            Self::Tournament(p) | Self::Custom(p) => p.train(pc, outcome),
            Self::Perceptron(p) => p.train(pc, outcome),
        }
    }

    fn storage_bits(&self) -> usize { self.inner().storage_bits() }
}
