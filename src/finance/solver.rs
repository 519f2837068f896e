//! Shared Newton-Raphson root finder
//!
//! Solving for a periodic rate, an IRR, or a bond yield all reduce to
//! finding a root of a smooth function of the rate. One routine serves all
//! four call sites.

/// Derivative magnitudes below this are treated as a flat tangent and stop
/// the iteration.
pub(crate) const DERIV_EPS: f64 = 1e-14;

/// Step tolerance shared by the rate solvers.
pub(crate) const RATE_TOL: f64 = 1e-10;

/// Find a root of `f` by Newton-Raphson.
///
/// `eval` returns `(f(r), f'(r))` at the current iterate. Iteration stops
/// when the step falls below `tol` or the derivative collapses. After
/// `max_iter` steps the last iterate is returned regardless, so callers must
/// validate plausibility themselves; a non-finite or wildly out-of-range
/// result means no root was found. An iterate at or below -1.0 is clamped to
/// `floor` to stay clear of the negative-compounding singularity.
pub(crate) fn find_root<F>(mut eval: F, guess: f64, max_iter: u32, tol: f64, floor: f64) -> f64
where
    F: FnMut(f64) -> (f64, f64),
{
    let mut r = guess;
    for _ in 0..max_iter {
        let (f, df) = eval(r);
        if df.abs() < DERIV_EPS {
            break;
        }
        let next = r - f / df;
        if (next - r).abs() < tol {
            return next;
        }
        r = next;
        if r <= -1.0 {
            r = floor;
        }
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_simple_root() {
        // x^2 - 2 = 0 from a positive guess
        let root = find_root(|x| (x * x - 2.0, 2.0 * x), 1.0, 100, 1e-12, -0.99);
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn test_flat_derivative_returns_current_iterate() {
        let root = find_root(|_| (1.0, 0.0), 0.25, 100, 1e-12, -0.99);
        assert!((root - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_clamps_below_negative_one() {
        // A step that overshoots past -1 must land on the floor, not beyond it
        let mut iterates = Vec::new();
        find_root(
            |r| {
                iterates.push(r);
                (r + 5.0, 1.0)
            },
            0.0,
            3,
            1e-12,
            -0.99,
        );
        assert!(iterates.iter().all(|&r| r > -1.0));
    }
}
