//! Predictor configuration.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The largest index width accepted for any table.
pub const MAX_INDEX_BITS: u32 = 28;

/// A branch prediction scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Always predict 'taken'.
    Static,
    /// A single table indexed by global history XOR'ed with the PC.
    Gshare,
    /// Local and global predictors arbitrated by a choice table.
    Tournament,
    /// A tournament predictor whose global side is indexed like gshare.
    Custom,
    /// A table of perceptrons over global history.
    Perceptron,
}
impl Scheme {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Static => "Static",
            Self::Gshare => "Gshare",
            Self::Tournament => "Tournament",
            Self::Custom => "Custom",
            Self::Perceptron => "Perceptron",
        }
    }
}
impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
impl FromStr for Scheme {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "gshare" => Ok(Self::Gshare),
            "tournament" => Ok(Self::Tournament),
            "custom" => Ok(Self::Custom),
            "perceptron" => Ok(Self::Perceptron),
            _ => Err(ConfigError::InvalidScheme(s.to_string())),
        }
    }
}

/// Configuration used to build a [`crate::BranchPredictor`].
///
/// The bit-widths are consumed by the gshare and tournament schemes.
/// The custom and perceptron schemes size themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredictorConfig {
    pub scheme: Scheme,

    /// Number of bits of global history
    pub ghistory_bits: u32,

    /// Number of bits of local history
    pub lhistory_bits: u32,

    /// Number of program counter bits used to select a local history
    pub pc_index_bits: u32,
}
impl PredictorConfig {
    pub const GSHARE_GHISTORY_BITS: u32 = 13;
    pub const TOURNAMENT_GHISTORY_BITS: u32 = 9;
    pub const TOURNAMENT_LHISTORY_BITS: u32 = 10;
    pub const TOURNAMENT_PC_INDEX_BITS: u32 = 10;

    pub fn new(scheme: Scheme, ghistory_bits: u32, lhistory_bits: u32,
        pc_index_bits: u32) -> Self
    {
        Self { scheme, ghistory_bits, lhistory_bits, pc_index_bits }
    }

    /// The default configuration for some scheme.
    pub fn for_scheme(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Gshare => Self::gshare(Self::GSHARE_GHISTORY_BITS),
            Scheme::Tournament => Self::tournament(
                Self::TOURNAMENT_GHISTORY_BITS,
                Self::TOURNAMENT_LHISTORY_BITS,
                Self::TOURNAMENT_PC_INDEX_BITS,
            ),
            _ => Self::new(scheme, 0, 0, 0),
        }
    }

    pub fn gshare(ghistory_bits: u32) -> Self {
        Self::new(Scheme::Gshare, ghistory_bits, 0, 0)
    }

    pub fn tournament(ghistory_bits: u32, lhistory_bits: u32,
        pc_index_bits: u32) -> Self
    {
        Self::new(Scheme::Tournament, ghistory_bits, lhistory_bits,
            pc_index_bits)
    }

    /// Check that every table this configuration would allocate has a
    /// reasonable size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let widths: Vec<(&'static str, u32)> = match self.scheme {
            Scheme::Gshare => vec![("global history", self.ghistory_bits)],
            Scheme::Tournament => vec![
                ("global history", self.ghistory_bits),
                ("local history", self.lhistory_bits),
                ("pc index", self.pc_index_bits),
            ],
            Scheme::Static | Scheme::Custom | Scheme::Perceptron => vec![],
        };
        for (name, bits) in widths {
            if bits > MAX_INDEX_BITS {
                return Err(ConfigError::TableTooLarge {
                    name, bits, max: MAX_INDEX_BITS,
                });
            }
        }
        Ok(())
    }
}
impl Default for PredictorConfig {
    fn default() -> Self { Self::for_scheme(Scheme::Static) }
}

impl fmt::Display for PredictorConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.scheme {
            Scheme::Gshare => write!(f, "{}:{}", self.scheme,
                self.ghistory_bits),
            Scheme::Tournament => write!(f, "{}:{}:{}:{}", self.scheme,
                self.ghistory_bits, self.lhistory_bits, self.pc_index_bits),
            _ => write!(f, "{}", self.scheme),
        }
    }
}

/// Parse a description of the form `<scheme>[:<bits>...]`, for instance
/// `gshare:13` or `tournament:9:10:10`. Omitted widths take the defaults
/// for the scheme.
impl FromStr for PredictorConfig {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidScheme(s.to_string());
        let mut fields = s.split(':');
        let scheme: Scheme = fields.next().unwrap_or_default().parse()
            .map_err(|_| invalid())?;
        let widths = fields.map(|x| x.parse::<u32>())
            .collect::<Result<Vec<u32>, _>>()
            .map_err(|_| invalid())?;

        let mut cfg = Self::for_scheme(scheme);
        match (scheme, widths.as_slice()) {
            (_, []) => {},
            (Scheme::Gshare, [g]) => cfg.ghistory_bits = *g,
            (Scheme::Tournament, [g, l, p]) => {
                cfg.ghistory_bits = *g;
                cfg.lhistory_bits = *l;
                cfg.pc_index_bits = *p;
            },
            _ => return Err(invalid()),
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
