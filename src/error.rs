//! Error types.

use thiserror::Error;

/// Errors reported while building a predictor from its configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A table would be indexed with more bits than we're willing to
    /// allocate.
    #[error("{name} uses {bits} index bits (at most {max} are supported)")]
    TableTooLarge { name: &'static str, bits: u32, max: u32 },

    /// The storage budget cannot hold a single perceptron.
    #[error("a budget of {budget} bits cannot hold one perceptron of {row_bits} bits")]
    EmptyPerceptron { budget: usize, row_bits: usize },

    /// A perceptron needs at least one bit of history.
    #[error("perceptron history length must be non-zero")]
    ZeroHistory,

    /// A scheme description could not be parsed.
    #[error("invalid predictor scheme '{0}'")]
    InvalidScheme(String),
}

/// Errors reported while reading a branch trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A line in the trace is malformed.
    #[error("line {line}: {reason} ('{text}')")]
    Parse { line: usize, text: String, reason: &'static str },
}
