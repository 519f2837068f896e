//! TVM register set and solve-target resolution

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CalcError;

/// Identifier for one of the five TVM registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Register {
    N,
    IYr,
    Pv,
    Pmt,
    Fv,
}

impl Register {
    /// All five registers in display order.
    pub const ALL: [Register; 5] = [
        Register::N,
        Register::IYr,
        Register::Pv,
        Register::Pmt,
        Register::Fv,
    ];

    /// Key label as printed on the calculator face.
    pub fn label(self) -> &'static str {
        match self {
            Register::N => "N",
            Register::IYr => "I/YR",
            Register::Pv => "PV",
            Register::Pmt => "PMT",
            Register::Fv => "FV",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five nullable TVM slots.
///
/// A slot is `None` until the user stores a value or a solve writes one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterSet {
    pub n: Option<f64>,
    pub i_yr: Option<f64>,
    pub pv: Option<f64>,
    pub pmt: Option<f64>,
    pub fv: Option<f64>,
}

impl RegisterSet {
    pub fn get(&self, reg: Register) -> Option<f64> {
        match reg {
            Register::N => self.n,
            Register::IYr => self.i_yr,
            Register::Pv => self.pv,
            Register::Pmt => self.pmt,
            Register::Fv => self.fv,
        }
    }

    pub fn set(&mut self, reg: Register, value: f64) {
        let slot = match reg {
            Register::N => &mut self.n,
            Register::IYr => &mut self.i_yr,
            Register::Pv => &mut self.pv,
            Register::Pmt => &mut self.pmt,
            Register::Fv => &mut self.fv,
        };
        *slot = Some(value);
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn filled_count(&self) -> usize {
        Register::ALL
            .iter()
            .filter(|&&reg| self.get(reg).is_some())
            .count()
    }

    /// Registers still holding no value, in display order.
    pub fn blanks(&self) -> Vec<Register> {
        Register::ALL
            .iter()
            .copied()
            .filter(|&reg| self.get(reg).is_none())
            .collect()
    }

    /// Decide which register a key-press solves for.
    ///
    /// A single blank register is always the target, whichever key was
    /// pressed (pressing a filled key re-triggers the one missing solve, as
    /// on the physical calculator). With all five filled the pressed
    /// register is recomputed from the other four. Anything else fails
    /// without touching the set.
    pub fn resolve_target(&self, pressed: Register) -> Result<Register, CalcError> {
        let blanks = self.blanks();
        if blanks.len() >= 2 {
            // Unsolvable either way: pressing a blank key is a data problem,
            // pressing a filled key leaves no unique target.
            return Err(if self.get(pressed).is_none() {
                CalcError::InsufficientData
            } else {
                CalcError::AmbiguousTarget
            });
        }
        match blanks.first() {
            Some(&blank) => Ok(blank),
            None => Ok(pressed),
        }
    }
}
