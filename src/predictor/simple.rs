
use crate::Outcome;
use crate::predictor::DirectionPredictor;

/// A simple predictor with no state: always predict 'taken'.
#[derive(Clone, Copy, Debug, Default)]
pub struct TakenPredictor;
impl DirectionPredictor for TakenPredictor {
    fn name(&self) -> &'static str { "TakenPredictor" }
    fn predict(&self, _pc: u32) -> Outcome { Outcome::T }
    fn train(&mut self, _pc: u32, _outcome: Outcome) {}
    fn storage_bits(&self) -> usize { 0 }
}
