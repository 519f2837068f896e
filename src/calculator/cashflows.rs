//! Compact cash-flow entry list for NPV/IRR

use serde::{Deserialize, Serialize};

/// One entered flow: an amount occupying `repeat` consecutive periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    pub amount: f64,
    pub repeat: u32,
}

/// Ordered cash-flow entries as typed on the calculator.
///
/// Entry 0 is the initial outlay at time zero and is never discounted.
/// Storing a repeat count rewrites the most recently entered amount instead
/// of appending, so "same payment k times" needs no retyping. Valuation
/// walks the expanded sequence, one amount per period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSeries {
    entries: Vec<CashFlowEntry>,
}

impl CashFlowSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an amount with repeat count 1.
    pub fn push(&mut self, amount: f64) {
        self.entries.push(CashFlowEntry { amount, repeat: 1 });
    }

    /// Set the repeat count of the last entered amount. Returns false when
    /// there is nothing to repeat or the count is zero.
    pub fn set_repeat(&mut self, count: u32) -> bool {
        if count == 0 {
            return false;
        }
        match self.entries.last_mut() {
            Some(entry) => {
                entry.repeat = count;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[CashFlowEntry] {
        &self.entries
    }

    /// One amount per period, for discounting.
    pub fn expanded(&self) -> Vec<f64> {
        let total = self.entries.iter().map(|e| e.repeat as usize).sum();
        let mut flows = Vec::with_capacity(total);
        for entry in &self.entries {
            for _ in 0..entry.repeat {
                flows.push(entry.amount);
            }
        }
        flows
    }
}
