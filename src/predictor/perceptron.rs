
use crate::Outcome;
use crate::error::ConfigError;
use crate::history::*;
use crate::predictor::DirectionPredictor;

/// Sizing for a [PerceptronPredictor].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerceptronConfig {
    /// Number of global history bits presented to each perceptron
    pub history_length: usize,

    /// Width of a single weight [in bits]
    pub bits_per_weight: usize,

    /// Number of program counter bits used to select a perceptron
    pub pc_index_bits: u32,

    /// Total number of bits available for weights
    pub storage_budget_bits: usize,
}
impl Default for PerceptronConfig {
    /// A 64 kbit budget spent on long history with 12-bit weights.
    fn default() -> Self {
        Self {
            history_length: 128,
            bits_per_weight: 12,
            pc_index_bits: 12,
            storage_budget_bits: 64 * 1024,
        }
    }
}
impl PerceptronConfig {
    /// Number of weights in a single perceptron (including the bias).
    pub fn row_size(&self) -> usize { self.history_length + 1 }

    /// Number of perceptrons that fit in the storage budget.
    pub fn num_perceptrons(&self) -> usize {
        self.storage_budget_bits / (self.row_size() * self.bits_per_weight)
    }

    /// Training threshold.
    /// Papers suggest this constant (based on the history length).
    pub fn threshold(&self) -> i32 {
        (1.93f64 * self.history_length as f64 + 14.0).round() as i32
    }

    pub fn build(self) -> Result<PerceptronPredictor, ConfigError> {
        PerceptronPredictor::new(self)
    }
}

/// A table of perceptrons [with integer weights] over global history.
///
/// See the following papers:
///
/// - "Dynamic Branch Prediction with Perceptrons" (Jiménez and Lin, 2001)
/// - "Neural Methods for Dynamic Branch Prediction" (Jiménez and Lin, 2002)
///
/// Each row holds one weight per history bit followed by a bias weight.
#[derive(Clone, Debug)]
pub struct PerceptronPredictor {
    cfg: PerceptronConfig,

    /// Table of weights (flattened, one row per perceptron)
    weights: Vec<i32>,

    /// Global history, newest outcome at the tail
    history: HistoryRegister,

    num_perceptrons: usize,
    threshold: i32,
    pc_mask: u32,
}
impl PerceptronPredictor {
    pub fn new(cfg: PerceptronConfig) -> Result<Self, ConfigError> {
        if cfg.history_length == 0 {
            return Err(ConfigError::ZeroHistory);
        }
        let num_perceptrons = cfg.num_perceptrons();
        if num_perceptrons == 0 {
            return Err(ConfigError::EmptyPerceptron {
                budget: cfg.storage_budget_bits,
                row_bits: cfg.row_size() * cfg.bits_per_weight,
            });
        }
        Ok(Self {
            cfg,
            weights: vec![0; num_perceptrons * cfg.row_size()],
            history: HistoryRegister::new(cfg.history_length),
            num_perceptrons,
            threshold: cfg.threshold(),
            pc_mask: mask(cfg.pc_index_bits),
        })
    }

    pub fn config(&self) -> &PerceptronConfig { &self.cfg }
    pub fn num_perceptrons(&self) -> usize { self.num_perceptrons }
    pub fn threshold(&self) -> i32 { self.threshold }
    pub fn history(&self) -> &HistoryRegister { &self.history }

    /// Select the perceptron associated with a program counter value.
    pub fn index(&self, pc: u32) -> usize {
        (pc & self.pc_mask) as usize % self.num_perceptrons
    }

    /// Return the weights of a single perceptron. The bias is the last
    /// element.
    pub fn weights(&self, idx: usize) -> &[i32] {
        let base = idx * self.cfg.row_size();
        &self.weights[base..base + self.cfg.row_size()]
    }

    /// Compute the dot product of the history and the weights, plus the
    /// bias.
    pub fn output(&self, idx: usize) -> i32 {
        let row = self.weights(idx);
        let (bias, weights) = match row.split_last() {
            Some((bias, weights)) => (*bias, weights),
            None => return 0,
        };
        weights.iter().zip(self.history.signs())
            .map(|(w, x)| w.saturating_mul(x))
            .fold(bias, |sum, val| sum.saturating_add(val))
    }
}

impl DirectionPredictor for PerceptronPredictor {
    fn name(&self) -> &'static str { "PerceptronPredictor" }

    fn predict(&self, pc: u32) -> Outcome {
        Outcome::from(self.output(self.index(pc)) >= 0)
    }

    fn train(&mut self, pc: u32, outcome: Outcome) {
        let idx = self.index(pc);
        let output = self.output(idx);
        let prediction = Outcome::from(output >= 0);

        // Training occurs after a misprediction, or when the magnitude of
        // the output is not above the threshold.
        let miss = prediction != outcome;
        let below_threshold = output.saturating_abs() <= self.threshold;

        if miss || below_threshold {
            let t = outcome.sign();
            let row_size = self.cfg.row_size();
            let base = idx * row_size;
            let row = &mut self.weights[base..base + row_size];
            for (w, x) in row.iter_mut().zip(self.history.signs()) {
                *w = w.saturating_add(t * x);
            }
            // The bias is assigned rather than accumulated
            row[row_size - 1] = t;
        }

        self.history.push(outcome);
    }

    fn storage_bits(&self) -> usize {
        self.weights.len() * self.cfg.bits_per_weight + self.history.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn small() -> PerceptronPredictor {
        PerceptronConfig {
            history_length: 4,
            bits_per_weight: 8,
            pc_index_bits: 4,
            storage_budget_bits: 5 * 8 * 16,
        }.build().unwrap()
    }

    #[test]
    fn default_sizing() {
        let cfg = PerceptronConfig::default();
        assert_eq!(cfg.num_perceptrons(), 42);
        assert_eq!(cfg.threshold(), 261);
    }

    #[test]
    fn threshold_is_rounded() {
        let cfg = PerceptronConfig { history_length: 4, ..Default::default() };
        // 1.93 * 4 + 14 = 21.72
        assert_eq!(cfg.threshold(), 22);
    }

    #[test]
    fn zero_output_predicts_taken() {
        let p = small();
        assert_eq!(p.output(p.index(0x3)), 0);
        assert_eq!(p.predict(0x3), Outcome::T);
    }

    #[test]
    fn first_update_follows_history() {
        let mut p = small();
        p.train(0x3, Outcome::T);
        let idx = p.index(0x3);
        // History was all 'not-taken', so each weight moves towards -1
        assert_eq!(p.weights(idx), &[-1, -1, -1, -1, 1]);
        assert_eq!(p.history().get(3), Outcome::T);
    }

    #[test]
    fn bias_is_assigned() {
        let mut p = small();
        p.train(0x3, Outcome::T);
        p.train(0x3, Outcome::T);
        let idx = p.index(0x3);
        assert_eq!(p.weights(idx)[4], 1);
        p.train(0x3, Outcome::N);
        assert_eq!(p.weights(idx)[4], -1);
    }

    #[test]
    fn rows_wrap_modulo_table_size() {
        let p = PerceptronConfig {
            history_length: 4,
            bits_per_weight: 8,
            pc_index_bits: 4,
            storage_budget_bits: 5 * 8 * 3,
        }.build().unwrap();
        assert_eq!(p.num_perceptrons(), 3);
        assert_eq!(p.index(0xf4), 1);
        assert_eq!(p.index(0x5), 2);
    }

    #[test]
    fn invalid_sizing_is_rejected() {
        let zero = PerceptronConfig { history_length: 0, ..Default::default() };
        assert_eq!(zero.build().unwrap_err(), ConfigError::ZeroHistory);
        let tiny = PerceptronConfig {
            storage_budget_bits: 10, ..Default::default()
        };
        assert!(matches!(tiny.build(),
            Err(ConfigError::EmptyPerceptron { .. })));
    }
}
