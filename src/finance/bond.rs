//! Coupon-bond pricing and yield solving
//!
//! A bond is the present value of its coupon stream plus a redemption
//! amount. Yield-to-maturity redeems at face value; yield-to-call redeems at
//! the call price while coupons stay on face. Price and yield share one
//! redemption-parameterized core each.

use super::solver::{find_root, RATE_TOL};

/// Default annual starting guess for the yield solvers.
pub const DEFAULT_YIELD_GUESS: f64 = 0.05;

/// Iteration cap for the yield solvers.
pub const YIELD_MAX_ITER: u32 = 500;

/// Rates closer to zero than this price linearly in the coupon count.
const NEAR_ZERO_RATE: f64 = 1e-14;

/// Present value of `n` coupons of `c` plus `redemption`, at periodic `r`.
fn price_at(c: f64, redemption: f64, r: f64, n: f64) -> f64 {
    if r == 0.0 {
        return c * n + redemption;
    }
    let factor = (1.0 + r).powf(n);
    c * (1.0 - 1.0 / factor) / r + redemption / factor
}

/// Periodic yield at which the bond prices to `market_price`.
fn solve_yield(market_price: f64, c: f64, redemption: f64, n: f64, periodic_guess: f64) -> f64 {
    find_root(
        |r| {
            if r.abs() < NEAR_ZERO_RATE {
                (c * n + redemption - market_price, c * n * (n + 1.0) / 2.0)
            } else {
                let factor = (1.0 + r).powf(n);
                let f = c * (1.0 - 1.0 / factor) / r + redemption / factor - market_price;
                let d_coupons =
                    c * (r * n / (1.0 + r).powf(n + 1.0) - (1.0 - 1.0 / factor)) / (r * r);
                let d_redemption = -n * redemption / (1.0 + r).powf(n + 1.0);
                (f, d_coupons + d_redemption)
            }
        },
        periodic_guess,
        YIELD_MAX_ITER,
        RATE_TOL,
        -0.99,
    )
}

/// Price a bond held to maturity.
///
/// `coupon_rate` and `ytm` are annual decimals; `payments_per_year` splits
/// them into periodic amounts.
pub fn price(face: f64, coupon_rate: f64, ytm: f64, years: f64, payments_per_year: u32) -> f64 {
    let m = payments_per_year as f64;
    price_at(coupon_rate / m * face, face, ytm / m, years * m)
}

/// Price a callable bond to its call date.
///
/// Coupons are still based on face value; the terminal payment is the call
/// price.
pub fn price_to_call(
    face: f64,
    call_price: f64,
    coupon_rate: f64,
    years_to_call: f64,
    ytc: f64,
    payments_per_year: u32,
) -> f64 {
    let m = payments_per_year as f64;
    price_at(coupon_rate / m * face, call_price, ytc / m, years_to_call * m)
}

/// Annual yield to maturity implied by `market_price`, from the default guess.
pub fn yield_to_maturity(
    market_price: f64,
    face: f64,
    coupon_rate: f64,
    years: f64,
    payments_per_year: u32,
) -> f64 {
    yield_to_maturity_with_guess(
        market_price,
        face,
        coupon_rate,
        years,
        payments_per_year,
        DEFAULT_YIELD_GUESS,
    )
}

/// Annual yield to maturity from an explicit annual `guess`.
pub fn yield_to_maturity_with_guess(
    market_price: f64,
    face: f64,
    coupon_rate: f64,
    years: f64,
    payments_per_year: u32,
    guess: f64,
) -> f64 {
    let m = payments_per_year as f64;
    solve_yield(market_price, coupon_rate / m * face, face, years * m, guess / m) * m
}

/// Annual yield to call implied by `market_price`, from the default guess.
pub fn yield_to_call(
    market_price: f64,
    face: f64,
    call_price: f64,
    coupon_rate: f64,
    years_to_call: f64,
    payments_per_year: u32,
) -> f64 {
    yield_to_call_with_guess(
        market_price,
        face,
        call_price,
        coupon_rate,
        years_to_call,
        payments_per_year,
        DEFAULT_YIELD_GUESS,
    )
}

/// Annual yield to call from an explicit annual `guess`.
pub fn yield_to_call_with_guess(
    market_price: f64,
    face: f64,
    call_price: f64,
    coupon_rate: f64,
    years_to_call: f64,
    payments_per_year: u32,
    guess: f64,
) -> f64 {
    let m = payments_per_year as f64;
    solve_yield(
        market_price,
        coupon_rate / m * face,
        call_price,
        years_to_call * m,
        guess / m,
    ) * m
}

/// Annual coupon income as a fraction of the price paid.
pub fn current_yield(annual_coupon: f64, market_price: f64) -> f64 {
    annual_coupon / market_price
}
