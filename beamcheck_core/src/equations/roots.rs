//! # Scalar Root Finding
//!
//! Bracketed bisection used by the equilibrium solvers. Termination is
//! guaranteed by the iteration cap; a missing sign change is reported as
//! `None` so callers can raise a convergence error naming their solver.

/// Absolute tolerance on the bracket width used by the section solvers
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Iteration cap; 200 halvings exhaust f64 precision on (0, 1)
pub const DEFAULT_MAX_ITER: usize = 200;

/// Root of `f` in `[a, b]` by bisection.
///
/// Returns `None` when `f(a)` and `f(b)` have the same strict sign or either
/// end is not finite.
///
/// # Example
/// ```rust
/// use beamcheck_core::equations::roots::bisection;
///
/// let root = bisection(|x| x * x - 2.0, 1.0, 2.0, 1e-12, 200).unwrap();
/// assert!((root - 2f64.sqrt()).abs() < 1e-10);
/// ```
pub fn bisection<F>(f: F, mut a: f64, mut b: f64, tol: f64, max_iter: usize) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    let mut fa = f(a);
    let fb = f(b);
    if !fa.is_finite() || !fb.is_finite() {
        return None;
    }
    if fa == 0.0 {
        return Some(a);
    }
    if fb == 0.0 {
        return Some(b);
    }
    if fa * fb > 0.0 {
        return None;
    }

    for _ in 0..max_iter {
        let c = 0.5 * (a + b);
        let fc = f(c);
        if fc == 0.0 || 0.5 * (b - a) < tol {
            return Some(c);
        }
        if fa * fc < 0.0 {
            b = c;
        } else {
            a = c;
            fa = fc;
        }
    }

    Some(0.5 * (a + b))
}
