//! Pure financial math: TVM, cash-flow valuation, bonds, rate conversions
//!
//! Every function takes explicit numeric arguments and returns a number; no
//! hidden state. Failure is signalled with a non-finite sentinel
//! (`f64::NAN`) rather than a panic or an error type, so the calculator
//! layer can treat all numeric failures uniformly.

mod cashflow;
mod rates;
mod solver;
mod tvm;

pub mod bond;

pub use cashflow::{
    discounted_flows, internal_rate_of_return, internal_rate_of_return_with_guess,
    net_present_value, sign_changes, DiscountedFlow, DEFAULT_IRR_GUESS, IRR_MAX_ITER,
};
pub use rates::{apr_to_ear, ear_to_apr};
pub use tvm::{
    future_value, number_of_periods, payment, present_value, rate, rate_with_guess,
    DEFAULT_RATE_GUESS, RATE_MAX_ITER,
};
