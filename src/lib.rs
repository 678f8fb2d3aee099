pub mod config;
pub mod error;
pub mod history;
pub mod predictor;
pub mod sim;
pub mod stats;
pub mod synth;
pub mod trace;

pub use config::*;
pub use error::*;
pub use history::*;
pub use predictor::*;
pub use trace::*;

/// A branch outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    /// Not taken
    N,
    /// Taken
    T,
}
impl Outcome {
    /// The signed encoding used by perceptron inputs: taken is `+1`,
    /// not-taken is `-1`.
    pub fn sign(self) -> i32 {
        match self {
            Self::T => 1,
            Self::N => -1,
        }
    }

    /// Returns 'true' if this outcome is 'taken'.
    pub fn is_taken(self) -> bool {
        matches!(self, Self::T)
    }
}
impl From<bool> for Outcome {
    fn from(x: bool) -> Self {
        match x {
            true => Self::T,
            false => Self::N
        }
    }
}
impl From<Outcome> for bool {
    fn from(x: Outcome) -> Self {
        match x {
            Outcome::T => true,
            Outcome::N => false,
        }
    }
}
