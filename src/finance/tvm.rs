//! Time-value-of-money solvers
//!
//! All five TVM variables satisfy one identity:
//!
//! ```text
//! pv*(1+r)^n + pmt*((1+r)^n - 1)/r * (1 + r*t) + fv = 0
//! ```
//!
//! where `t` is 1 for an annuity due (payments at period start) and 0 for an
//! ordinary annuity. Each solver rearranges the identity for its variable;
//! `rate` iterates because the identity has no closed form in `r`.
//!
//! Sign convention: cash received is positive, cash paid is negative. The
//! solvers return whatever value balances the identity; callers keep PV and
//! PMT/FV opposite-signed for a consistent loan or investment model.

use super::solver::{find_root, RATE_TOL};

/// Default starting guess for the periodic rate solver.
pub const DEFAULT_RATE_GUESS: f64 = 0.1;

/// Iteration cap for the rate solver.
pub const RATE_MAX_ITER: u32 = 200;

/// Rates closer to zero than this use the linearized identity; the analytic
/// derivative is ill-conditioned there.
const NEAR_ZERO_RATE: f64 = 1e-14;

fn timing(due: bool) -> f64 {
    if due {
        1.0
    } else {
        0.0
    }
}

/// Future value of `pv` plus `periods` payments of `pmt` at periodic `rate`.
///
/// Degenerates to `-(pv + pmt*n)` at zero rate.
pub fn future_value(pv: f64, pmt: f64, rate: f64, periods: f64, due: bool) -> f64 {
    let t = timing(due);
    if rate == 0.0 {
        return -(pv + pmt * periods);
    }
    let factor = (1.0 + rate).powf(periods);
    -(pv * factor + pmt * ((factor - 1.0) / rate) * (1.0 + rate * t))
}

/// Present value that balances `fv` and `periods` payments of `pmt`.
pub fn present_value(fv: f64, pmt: f64, rate: f64, periods: f64, due: bool) -> f64 {
    let t = timing(due);
    if rate == 0.0 {
        return -(fv + pmt * periods);
    }
    let factor = (1.0 + rate).powf(periods);
    -(fv + pmt * ((factor - 1.0) / rate) * (1.0 + rate * t)) / factor
}

/// Periodic payment that balances `pv` and `fv` over `periods`.
pub fn payment(pv: f64, fv: f64, rate: f64, periods: f64, due: bool) -> f64 {
    let t = timing(due);
    if rate == 0.0 {
        return -(pv + fv) / periods;
    }
    let factor = (1.0 + rate).powf(periods);
    -(pv * factor + fv) / (((factor - 1.0) / rate) * (1.0 + rate * t))
}

/// Number of periods that balances the identity.
///
/// Closed form via logarithms. Returns NaN when no real solution exists:
/// zero rate with zero payment, pure compounding from a zero PV, a zero
/// denominator, or a non-positive logarithm argument.
pub fn number_of_periods(pv: f64, fv: f64, pmt: f64, rate: f64, due: bool) -> f64 {
    let t = timing(due);
    if rate == 0.0 {
        if pmt == 0.0 {
            return f64::NAN;
        }
        return -(pv + fv) / pmt;
    }
    let pmt_adj = pmt * (1.0 + rate * t);
    if pmt_adj == 0.0 {
        // No payments: pure compounding, pv*(1+r)^n + fv = 0
        if pv == 0.0 {
            return f64::NAN;
        }
        let ratio = -fv / pv;
        if ratio <= 0.0 {
            return f64::NAN;
        }
        return ratio.ln() / (1.0 + rate).ln();
    }
    let num = pmt_adj - fv * rate;
    let den = pmt_adj + pv * rate;
    if den == 0.0 || num / den <= 0.0 {
        return f64::NAN;
    }
    (num / den).ln() / (1.0 + rate).ln()
}

/// Periodic rate that balances the identity, from the default guess.
pub fn rate(pv: f64, fv: f64, pmt: f64, periods: f64, due: bool) -> f64 {
    rate_with_guess(pv, fv, pmt, periods, due, DEFAULT_RATE_GUESS)
}

/// Periodic rate that balances the identity, by Newton-Raphson.
///
/// Returns the last iterate even when convergence was not reached; callers
/// reject non-finite or implausible results.
pub fn rate_with_guess(pv: f64, fv: f64, pmt: f64, periods: f64, due: bool, guess: f64) -> f64 {
    let t = timing(due);
    let n = periods;
    find_root(
        |r| {
            if r.abs() < NEAR_ZERO_RATE {
                (pv + fv + pmt * n, pmt * n * (n - 1.0) / 2.0)
            } else {
                let factor = (1.0 + r).powf(n);
                let annuity = ((factor - 1.0) / r) * (1.0 + r * t);
                let f = pv * factor + pmt * annuity + fv;

                let d_factor = n * (1.0 + r).powf(n - 1.0);
                let d_annuity_base = (r * d_factor - factor + 1.0) / (r * r);
                let d_annuity = d_annuity_base * (1.0 + r * t) + ((factor - 1.0) / r) * t;
                (f, pv * d_factor + pmt * d_annuity)
            }
        },
        guess,
        RATE_MAX_ITER,
        RATE_TOL,
        -0.99,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_zero_rate_future_value_is_linear() {
        // No iteration involved; must hold exactly
        assert_eq!(future_value(1000.0, 50.0, 0.0, 12.0, false), -(1000.0 + 50.0 * 12.0));
        assert_eq!(future_value(-500.0, 0.0, 0.0, 36.0, true), 500.0);
    }

    #[test]
    fn test_round_trip_pv_fv() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let pv: f64 = rng.gen_range(-10_000.0..10_000.0);
            let pmt: f64 = rng.gen_range(-500.0..500.0);
            let mut r: f64 = rng.gen_range(-0.5..0.5);
            if r.abs() < 1e-3 {
                r = 0.05;
            }
            let n = rng.gen_range(1..=600) as f64;
            let due = rng.gen_bool(0.5);

            // Deeply negative rates over long horizons shrink the PV term
            // toward float resolution; too little information survives the
            // cancellation to invert within tolerance.
            if (1.0 + r).powf(n) < 1e-3 {
                continue;
            }

            let fv = future_value(pv, pmt, r, n, due);
            assert!(fv.is_finite());
            let back = present_value(fv, pmt, r, n, due);
            assert!(
                (back - pv).abs() < 1e-6 * pv.abs().max(1.0),
                "pv={} pmt={} r={} n={} due={} -> fv={} back={}",
                pv, pmt, r, n, due, fv, back
            );
        }
    }

    #[test]
    fn test_payment_thirty_year_mortgage() {
        // $300k loan, 6% annual compounded monthly, 360 payments
        let pmt = payment(-300_000.0, 0.0, 0.06 / 12.0, 360.0, false);
        assert!((pmt - 1798.65).abs() < 0.01, "got {}", pmt);

        // And the PV recovered from that payment matches the principal
        let pv = present_value(0.0, pmt, 0.005, 360.0, false);
        assert!((pv + 300_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_rate_inversion() {
        // -1000 grows to 2000 over 10 periods: r = 2^(1/10) - 1
        let r = rate(-1000.0, 2000.0, 0.0, 10.0, false);
        let fv = future_value(-1000.0, 0.0, r, 10.0, false);
        assert!((fv - 2000.0).abs() < 1e-6, "r={} fv={}", r, fv);
        assert!((r - (2f64.powf(0.1) - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_rate_converges_to_zero() {
        // pv and fv cancel exactly: the root is r = 0
        let r = rate(-1000.0, 1000.0, 0.0, 10.0, false);
        assert!(r.abs() < 1e-8, "got {}", r);
    }

    #[test]
    fn test_number_of_periods_closed_form() {
        let pmt = payment(-250_000.0, 0.0, 0.004, 240.0, false);
        let n = number_of_periods(-250_000.0, 0.0, pmt, 0.004, false);
        assert!((n - 240.0).abs() < 1e-6, "got {}", n);
    }

    #[test]
    fn test_number_of_periods_pure_compounding() {
        let r = 2f64.powf(0.1) - 1.0;
        let n = number_of_periods(-1000.0, 2000.0, 0.0, r, false);
        assert!((n - 10.0).abs() < 1e-9, "got {}", n);
    }

    #[test]
    fn test_number_of_periods_degenerate_inputs() {
        // Zero rate and zero payment: nothing ever moves
        assert!(number_of_periods(-1000.0, 2000.0, 0.0, 0.0, false).is_nan());
        // Pure compounding from nothing
        assert!(number_of_periods(0.0, 2000.0, 0.0, 0.05, false).is_nan());
        // Same-signed pv and fv cannot compound across zero
        assert!(number_of_periods(1000.0, 2000.0, 0.0, 0.05, false).is_nan());
        // Zero rate reduces to linear division
        let n = number_of_periods(-1000.0, 400.0, 100.0, 0.0, false);
        assert!((n - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_annuity_due_earns_one_extra_period() {
        // With pv = 0 the due payment stream is the ordinary one shifted by
        // a single compounding period
        let ordinary = future_value(0.0, -100.0, 0.05, 10.0, false);
        let due = future_value(0.0, -100.0, 0.05, 10.0, true);
        assert!((due - ordinary * 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_three_solvers_agree() {
        let (pv, r, n) = (-42_000.0, 0.0035, 48.0);
        let pmt = payment(pv, 0.0, r, n, false);
        let fv = future_value(pv, pmt, r, n, false);
        assert!(fv.abs() < 1e-6, "identity should close: fv={}", fv);
    }
}
