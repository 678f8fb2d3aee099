//! Reading branch traces.
//!
//! A trace is plain text with one conditional branch per line: the program
//! counter in hexadecimal followed by the outcome (`1` for taken, `0` for
//! not-taken), for instance `0x40a3c4 1`.

use std::fs::File;
use std::io::{ self, BufRead, BufReader };
use std::path::Path;

use crate::Outcome;
use crate::error::TraceError;

/// A record of branch execution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BranchRecord {
    /// The program counter value for this branch
    pub pc: u32,

    /// The outcome evaluated for this branch
    pub outcome: Outcome,
}
impl BranchRecord {
    pub fn new(pc: u32, outcome: Outcome) -> Self {
        Self { pc, outcome }
    }

    /// Parse a single line of a trace. The line number is only used for
    /// reporting errors.
    pub fn parse(line: usize, text: &str) -> Result<Self, TraceError> {
        let err = |reason| TraceError::Parse {
            line, text: text.to_string(), reason,
        };

        let mut fields = text.split_whitespace();
        let pc_field = fields.next().ok_or_else(|| err("missing pc"))?;
        let outcome_field = fields.next().ok_or_else(|| err("missing outcome"))?;
        if fields.next().is_some() {
            return Err(err("trailing fields"));
        }

        let digits = pc_field.strip_prefix("0x")
            .or_else(|| pc_field.strip_prefix("0X"))
            .unwrap_or(pc_field);
        let pc = u32::from_str_radix(digits, 16)
            .map_err(|_| err("invalid pc"))?;
        let outcome = match outcome_field {
            "0" => Outcome::N,
            "1" => Outcome::T,
            _ => return Err(err("invalid outcome")),
        };
        Ok(Self { pc, outcome })
    }
}

/// Iterator over the [BranchRecord]s in some text trace.
pub struct TraceReader<R: BufRead> {
    lines: io::Lines<R>,
    line: usize,
}
impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line: 0 }
    }
}
impl TraceReader<BufReader<File>> {
    /// Open a trace file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let f = File::open(path)?;
        Ok(Self::new(BufReader::new(f)))
    }
}
impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<BranchRecord, TraceError>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            if text.trim().is_empty() {
                continue;
            }
            return Some(BranchRecord::parse(self.line, &text));
        }
    }
}
