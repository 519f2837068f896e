//! Calculator command surface: key handling, register solves, cash flows
//!
//! Commands mirror the front-panel keys of a TVM calculator. Each runs to
//! completion synchronously and mutates nothing on failure; the caller is a
//! single input stream (one key-press handler at a time).

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::cashflows::CashFlowSeries;
use super::registers::{Register, RegisterSet};
use super::state::{format_value, DisplayStatus, EntryState};
use crate::error::CalcError;
use crate::finance;

/// Chained arithmetic operators on the numeric keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithOp {
    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Subtract => a - b,
            ArithOp::Multiply => a * b,
            ArithOp::Divide => {
                if b == 0.0 {
                    f64::NAN
                } else {
                    a / b
                }
            }
        }
    }
}

/// Everything a display layer needs to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub registers: RegisterSet,
    pub payments_per_year: u32,
    pub annuity_due: bool,
    pub status: DisplayStatus,
}

/// Emitted after every successful TVM solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveOutcome {
    pub registers: RegisterSet,
    pub payments_per_year: u32,
    pub annuity_due: bool,
    pub solved: Register,
    pub value: f64,
}

/// Register-driven financial calculator.
///
/// Holds the five TVM registers plus entry, timing, cash-flow, and memory
/// state. The numeric work is delegated to [`crate::finance`]; this type
/// owns persistence of state across key presses and the decision of which
/// register a solve targets.
#[derive(Debug, Clone)]
pub struct Calculator {
    registers: RegisterSet,
    payments_per_year: u32,
    annuity_due: bool,
    entry: EntryState,
    display_value: f64,
    cash_flows: CashFlowSeries,
    memory: f64,
    stored: f64,
    pending_op: Option<(ArithOp, f64)>,
    last_solve: Option<SolveOutcome>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            registers: RegisterSet::default(),
            payments_per_year: 1,
            annuity_due: false,
            entry: EntryState::Idle,
            display_value: 0.0,
            cash_flows: CashFlowSeries::new(),
            memory: 0.0,
            stored: 0.0,
            pending_op: None,
            last_solve: None,
        }
    }

    // ----- entry -----

    pub fn enter_digit(&mut self, digit: u8) {
        self.absorb_error();
        self.entry.push_digit(digit);
    }

    pub fn enter_decimal(&mut self) {
        self.absorb_error();
        self.entry.push_decimal();
    }

    /// Negate the pending literal, or the displayed value when idle.
    pub fn toggle_sign(&mut self) {
        self.absorb_error();
        if !self.entry.toggle_sign() && self.display_value != 0.0 {
            self.display_value = -self.display_value;
        }
    }

    pub fn backspace(&mut self) {
        self.absorb_error();
        self.entry.backspace();
    }

    // ----- TVM registers -----

    /// The physical TVM key: stores while a literal is pending, solves
    /// otherwise.
    pub fn press_register(&mut self, reg: Register) -> Result<Option<SolveOutcome>, CalcError> {
        self.absorb_error();
        if self.entry.is_entering() {
            self.store_register(reg);
            Ok(None)
        } else {
            self.solve_register(reg).map(Some)
        }
    }

    /// Commit the pending entry (or displayed value) into a register.
    pub fn store_register(&mut self, reg: Register) {
        self.absorb_error();
        let value = self.current_value();
        self.set_register(reg, value);
    }

    /// Assign a register directly, bypassing digit entry.
    pub fn set_register(&mut self, reg: Register, value: f64) {
        self.absorb_error();
        self.registers.set(reg, value);
        self.display_value = value;
        self.entry = EntryState::Idle;
    }

    /// Shifted N entry: interpret `years` in years and store years x P/YR
    /// periods into N.
    pub fn store_years(&mut self, years: f64) {
        self.absorb_error();
        let periods = years * self.payments_per_year as f64;
        self.set_register(Register::N, periods);
    }

    /// Solve for `pressed` (or the single blank register) from the others.
    ///
    /// On success the target register is overwritten and the full snapshot
    /// is returned for collaborators that persist or display results. On
    /// failure the register set is left exactly as it was.
    pub fn solve_register(&mut self, pressed: Register) -> Result<SolveOutcome, CalcError> {
        self.absorb_error();
        let target = match self.registers.resolve_target(pressed) {
            Ok(target) => target,
            Err(err) => {
                self.entry = EntryState::Error;
                return Err(err);
            }
        };
        let value = self.compute_register(target);
        if !value.is_finite() {
            self.entry = EntryState::Error;
            return Err(CalcError::Divergence(target.to_string()));
        }
        debug!("solved {} = {}", target, value);
        self.registers.set(target, value);
        self.display_value = value;
        self.entry = EntryState::Solved;
        let outcome = SolveOutcome {
            registers: self.registers.clone(),
            payments_per_year: self.payments_per_year,
            annuity_due: self.annuity_due,
            solved: target,
            value,
        };
        self.last_solve = Some(outcome.clone());
        Ok(outcome)
    }

    fn compute_register(&self, target: Register) -> f64 {
        let reg = |r: Register| self.registers.get(r).unwrap_or(f64::NAN);
        let due = self.annuity_due;
        let n = reg(Register::N);
        let pv = reg(Register::Pv);
        let pmt = reg(Register::Pmt);
        let fv = reg(Register::Fv);
        match target {
            Register::Fv => finance::future_value(pv, pmt, self.periodic_rate(), n, due),
            Register::Pv => finance::present_value(fv, pmt, self.periodic_rate(), n, due),
            Register::Pmt => finance::payment(pv, fv, self.periodic_rate(), n, due),
            Register::N => finance::number_of_periods(pv, fv, pmt, self.periodic_rate(), due),
            Register::IYr => {
                let periodic = finance::rate(pv, fv, pmt, n, due);
                periodic * self.payments_per_year as f64 * 100.0
            }
        }
    }

    /// Per-period rate fed to the solvers: the stored nominal annual
    /// percent scaled down by payment frequency.
    fn periodic_rate(&self) -> f64 {
        let i_yr = self.registers.get(Register::IYr).unwrap_or(f64::NAN);
        (i_yr / 100.0) / self.payments_per_year as f64
    }

    // ----- timing and frequency -----

    /// Flip between ordinary annuity and annuity due.
    pub fn toggle_timing(&mut self) {
        self.absorb_error();
        self.annuity_due = !self.annuity_due;
    }

    pub fn set_payments_per_year(&mut self, count: u32) -> Result<(), CalcError> {
        self.absorb_error();
        if count == 0 {
            return Err(CalcError::Input(
                "payments per year must be at least 1".to_string(),
            ));
        }
        self.payments_per_year = count;
        Ok(())
    }

    // ----- clearing -----

    /// Drop the pending entry and any chained operator; registers survive.
    pub fn clear_entry(&mut self) {
        self.entry = EntryState::Idle;
        self.display_value = 0.0;
        self.pending_op = None;
    }

    /// Full reset: registers, timing, frequency, memory, cash flows.
    pub fn clear_all(&mut self) {
        self.clear_entry();
        self.registers.clear();
        self.payments_per_year = 1;
        self.annuity_due = false;
        self.memory = 0.0;
        self.stored = 0.0;
        self.cash_flows.clear();
        self.last_solve = None;
    }

    // ----- cash flows -----

    /// Append a cash flow with repeat count 1.
    pub fn add_cash_flow(&mut self, amount: f64) {
        self.absorb_error();
        self.cash_flows.push(amount);
    }

    /// Repeat the most recently entered cash flow `count` times.
    pub fn set_repeat_count(&mut self, count: u32) -> Result<(), CalcError> {
        self.absorb_error();
        if !self.cash_flows.set_repeat(count) {
            return Err(CalcError::Input(
                "repeat count needs a stored cash flow and a positive count".to_string(),
            ));
        }
        Ok(())
    }

    /// NPV of the entered cash flows at a nominal annual rate in percent.
    pub fn compute_npv(&mut self, annual_rate_pct: f64) -> Result<f64, CalcError> {
        self.absorb_error();
        let periodic = (annual_rate_pct / 100.0) / self.payments_per_year as f64;
        let flows = self.cash_flows.expanded();
        let value = finance::net_present_value(periodic, &flows);
        if !value.is_finite() {
            self.entry = EntryState::Error;
            return Err(CalcError::Divergence("NPV".to_string()));
        }
        self.display_value = value;
        self.entry = EntryState::Solved;
        Ok(value)
    }

    /// Annualized IRR in percent of the entered cash flows.
    pub fn compute_irr(&mut self) -> Result<f64, CalcError> {
        self.absorb_error();
        let flows = self.cash_flows.expanded();
        if flows.len() < 2 {
            self.entry = EntryState::Error;
            return Err(CalcError::DegenerateSeries);
        }
        let changes = finance::sign_changes(&flows);
        if changes > 1 {
            warn!("{} sign changes in cash flows; IRR may not be unique", changes);
        }
        let periodic = finance::internal_rate_of_return(&flows);
        if !periodic.is_finite() {
            self.entry = EntryState::Error;
            return Err(CalcError::Divergence("IRR".to_string()));
        }
        let annualized = periodic * self.payments_per_year as f64 * 100.0;
        self.display_value = annualized;
        self.entry = EntryState::Solved;
        Ok(annualized)
    }

    // ----- arithmetic -----

    /// Chain an arithmetic operator; any pending operation is evaluated
    /// first, as on the keypad.
    pub fn apply_operator(&mut self, op: ArithOp) {
        self.absorb_error();
        let value = self.current_value();
        let result = match self.pending_op.take() {
            Some((pending, operand)) if self.entry.is_entering() => pending.apply(operand, value),
            _ => value,
        };
        self.display_value = result;
        self.pending_op = Some((op, result));
        self.entry = EntryState::Idle;
    }

    /// Divide the current value by 100.
    pub fn percent(&mut self) {
        self.absorb_error();
        self.display_value = self.current_value() / 100.0;
        self.entry = EntryState::Idle;
    }

    // ----- memory -----

    /// Add the current value into the memory accumulator.
    pub fn memory_add(&mut self) {
        self.absorb_error();
        self.memory += self.current_value();
    }

    pub fn memory_recall(&mut self) {
        self.absorb_error();
        self.display_value = self.memory;
        self.entry = EntryState::Idle;
    }

    /// Park the current value in the store slot.
    pub fn store_value(&mut self) {
        self.absorb_error();
        self.stored = self.current_value();
    }

    pub fn recall_value(&mut self) {
        self.absorb_error();
        self.display_value = self.stored;
        self.entry = EntryState::Idle;
    }

    // ----- queries -----

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            registers: self.registers.clone(),
            payments_per_year: self.payments_per_year,
            annuity_due: self.annuity_due,
            status: self.entry.status(),
        }
    }

    /// Current LCD contents.
    pub fn display(&self) -> String {
        match &self.entry {
            EntryState::Entering { buffer } => buffer.clone(),
            EntryState::Error => "Error".to_string(),
            _ => format_value(self.display_value),
        }
    }

    pub fn registers(&self) -> &RegisterSet {
        &self.registers
    }

    pub fn cash_flows(&self) -> &CashFlowSeries {
        &self.cash_flows
    }

    pub fn last_solve(&self) -> Option<&SolveOutcome> {
        self.last_solve.as_ref()
    }

    pub fn payments_per_year(&self) -> u32 {
        self.payments_per_year
    }

    pub fn annuity_due(&self) -> bool {
        self.annuity_due
    }

    // ----- internals -----

    /// Value a command consumes: the pending literal if one is being typed,
    /// otherwise the displayed value.
    fn current_value(&self) -> f64 {
        self.entry.pending_value().unwrap_or(self.display_value)
    }

    /// An error display never survives the next key.
    fn absorb_error(&mut self) {
        if self.entry == EntryState::Error {
            self.entry = EntryState::Idle;
        }
    }
}
