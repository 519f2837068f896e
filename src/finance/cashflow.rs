//! Cash-flow series valuation: NPV, IRR, and sign-change diagnostics
//!
//! Flows are indexed from time zero; the first flow is the initial outlay
//! and is never discounted.

use serde::{Deserialize, Serialize};

use super::solver::{find_root, RATE_TOL};

/// Default starting guess for the IRR solver.
pub const DEFAULT_IRR_GUESS: f64 = 0.1;

/// Iteration cap for the IRR solver.
pub const IRR_MAX_ITER: u32 = 500;

/// An IRR candidate is accepted only if the NPV it implies is this close to
/// zero; a stalled iterate is reported as failure instead of a plausible but
/// wrong rate.
const IRR_NPV_TOL: f64 = 0.01;

/// Net present value of `flows` at a periodic discount `rate`.
pub fn net_present_value(rate: f64, flows: &[f64]) -> f64 {
    flows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Present value of a single flow, for period-by-period display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountedFlow {
    pub period: usize,
    pub amount: f64,
    pub present_value: f64,
}

/// Discount each flow at `rate` and keep the per-period values.
pub fn discounted_flows(rate: f64, flows: &[f64]) -> Vec<DiscountedFlow> {
    flows
        .iter()
        .enumerate()
        .map(|(t, &cf)| DiscountedFlow {
            period: t,
            amount: cf,
            present_value: cf / (1.0 + rate).powi(t as i32),
        })
        .collect()
}

/// Internal rate of return of `flows`, from the default guess.
pub fn internal_rate_of_return(flows: &[f64]) -> f64 {
    internal_rate_of_return_with_guess(flows, DEFAULT_IRR_GUESS, IRR_MAX_ITER)
}

/// Periodic rate at which `flows` discount to zero, by Newton-Raphson.
///
/// Returns NaN for fewer than two flows (root-finding on a single-flow
/// series is degenerate) and when the iteration stalls without actually
/// zeroing the NPV.
pub fn internal_rate_of_return_with_guess(flows: &[f64], guess: f64, max_iter: u32) -> f64 {
    if flows.len() < 2 {
        return f64::NAN;
    }
    let root = find_root(
        |r| {
            let mut f = 0.0;
            let mut df = 0.0;
            for (t, &cf) in flows.iter().enumerate() {
                f += cf / (1.0 + r).powi(t as i32);
                if t > 0 {
                    df -= t as f64 * cf / (1.0 + r).powi(t as i32 + 1);
                }
            }
            (f, df)
        },
        guess,
        max_iter,
        RATE_TOL,
        -0.99,
    );
    if net_present_value(root, flows).abs() < IRR_NPV_TOL {
        root
    } else {
        f64::NAN
    }
}

/// Count adjacent sign flips, ignoring zero entries.
///
/// More than one change means the series can admit multiple IRRs; callers
/// use the count to warn, nothing is decided here.
pub fn sign_changes(flows: &[f64]) -> u32 {
    flows
        .windows(2)
        .filter(|w| w[0] != 0.0 && w[1] != 0.0 && w[0].signum() != w[1].signum())
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_npv_known_value() {
        let flows = [-1000.0, 500.0, 500.0, 500.0];
        let npv = net_present_value(0.1, &flows);
        assert!((npv - 243.42).abs() < 0.01, "got {}", npv);
    }

    #[test]
    fn test_first_flow_is_not_discounted() {
        assert_eq!(net_present_value(0.25, &[-1000.0]), -1000.0);
    }

    #[test]
    fn test_irr_npv_consistency() {
        let flows = [-1000.0, 300.0, 300.0, 300.0, 300.0, 300.0];
        let irr = internal_rate_of_return(&flows);
        assert!(irr.is_finite());
        assert!(
            net_present_value(irr, &flows).abs() < 1e-6,
            "irr={} residual={}",
            irr,
            net_present_value(irr, &flows)
        );
    }

    #[test]
    fn test_irr_single_flow_is_degenerate() {
        assert!(internal_rate_of_return(&[-1000.0]).is_nan());
        assert!(internal_rate_of_return(&[]).is_nan());
    }

    #[test]
    fn test_irr_without_sign_change_fails() {
        // All-positive flows have no root; the sanity check must reject the
        // stalled iterate rather than report a rate
        assert!(internal_rate_of_return(&[100.0, 200.0, 300.0]).is_nan());
    }

    #[test]
    fn test_discounted_flows_match_npv() {
        let flows = [-1000.0, 400.0, 400.0, 400.0];
        let rows = discounted_flows(0.08, &flows);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].present_value, -1000.0);
        let total: f64 = rows.iter().map(|r| r.present_value).sum();
        assert!((total - net_present_value(0.08, &flows)).abs() < 1e-9);
    }

    #[test]
    fn test_sign_changes() {
        assert_eq!(sign_changes(&[-1000.0, 300.0, 300.0]), 1);
        assert_eq!(sign_changes(&[-1000.0, 500.0, -500.0, 500.0]), 3);
        // A zero breaks the adjacency; it is not a flip
        assert_eq!(sign_changes(&[-1000.0, 0.0, 500.0]), 0);
        assert_eq!(sign_changes(&[100.0, 200.0]), 0);
        assert_eq!(sign_changes(&[]), 0);
    }
}
