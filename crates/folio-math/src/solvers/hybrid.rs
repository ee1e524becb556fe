//! Newton-Raphson with a Brent fallback.

use crate::error::{MathError, MathResult};
use crate::solvers::newton::{iterate, DivergenceGuard};
use crate::solvers::{brent, SolverConfig, SolverResult};

/// Newton gives up once the residual has grown this many steps in a row, or
/// a single step exceeds the bound.
const NEWTON_GUARD: DivergenceGuard = DivergenceGuard {
    growth_steps: 3,
    max_step: 1e10,
};

/// Newton iterations attempted before falling back to Brent.
const NEWTON_ITERATION_CAP: u32 = 50;

/// Widest half-width probed when no bracket is supplied.
const MAX_BRACKET_HALF_WIDTH: f64 = 1e6;

/// Hybrid root-finding algorithm.
///
/// Newton runs first from `initial_guess`. If it diverges, meets a flat
/// derivative, leaves the domain of `f` or runs out of iterations, Brent takes
/// over on `bounds`. With `bounds` set to `None` the bracket is found by
/// probing outward from `initial_guess`.
///
/// # Example
///
/// ```rust
/// use folio_math::solvers::{hybrid, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let df = |x: f64| 3.0 * x * x - 1.0;
///
/// let result = hybrid(f, df, 1.5, Some((1.0, 2.0)), &SolverConfig::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-9);
/// ```
pub fn hybrid<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let budget = config.max_iterations.min(NEWTON_ITERATION_CAP);
    let guard = Some(NEWTON_GUARD);
    let newton_err = match iterate(&f, &df, initial_guess, budget, config.tolerance, guard) {
        Ok(result) => return Ok(result),
        Err(err) => err,
    };

    log::debug!("newton failed from x0 = {initial_guess}: {newton_err}; falling back to brent");

    let (a, b) = match bounds {
        Some(bracket) => bracket,
        None => find_bracket(&f, initial_guess).ok_or_else(|| {
            MathError::invalid_input(format!(
                "no sign change found around {initial_guess} after Newton failed ({newton_err})"
            ))
        })?,
    };

    brent(&f, a, b, config)
}

/// Probes `origin -/+ w` for doubling `w` until `f` changes sign.
///
/// Points where `f` is not finite never count as a sign change.
fn find_bracket<F>(f: &F, origin: f64) -> Option<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let f_origin = f(origin);
    if !f_origin.is_finite() {
        return None;
    }
    let flips = |x: f64| {
        let fx = f(x);
        fx.is_finite() && fx * f_origin < 0.0
    };

    std::iter::successors(Some(0.1_f64), |w| Some(w * 2.0))
        .take_while(|w| *w <= MAX_BRACKET_HALF_WIDTH)
        .find_map(|w| {
            if flips(origin - w) {
                Some((origin - w, origin))
            } else if flips(origin + w) {
                Some((origin, origin + w))
            } else {
                None
            }
        })
}
