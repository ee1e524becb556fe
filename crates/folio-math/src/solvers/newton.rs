//! Newton-Raphson iteration.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult, MIN_DERIVATIVE};

/// Newton-Raphson root-finding algorithm.
///
/// Iterates `x <- x - f(x) / f'(x)` until either `|f(x)|` or the step falls
/// below `config.tolerance`.
///
/// Fails with [`MathError::DivisionByZero`] when `f'` vanishes and with
/// [`MathError::NonFinite`] when `f` or `f'` cannot be evaluated at an
/// iterate. Discount functions hit the latter once the rate reaches -100%.
///
/// # Example
///
/// ```rust
/// use folio_math::solvers::{newton_raphson, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = newton_raphson(f, df, 1.5, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    iterate(&f, &df, initial_guess, config.max_iterations, config.tolerance, None)
}

/// Early-exit rules for a Newton run that has a fallback behind it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DivergenceGuard {
    /// Consecutive steps whose residual more than doubles.
    pub growth_steps: u32,
    /// Largest step accepted.
    pub max_step: f64,
}

pub(crate) fn iterate<F, DF>(
    f: &F,
    df: &DF,
    initial_guess: f64,
    budget: u32,
    tolerance: f64,
    guard: Option<DivergenceGuard>,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;
    let mut last_residual = f64::INFINITY;
    let mut growing = 0;

    for n in 0..budget {
        let fx = finite_at(f(x), x)?;
        if fx.abs() < tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: n,
                residual: fx,
            });
        }

        if let Some(guard) = guard {
            growing = if fx.abs() > 2.0 * last_residual { growing + 1 } else { 0 };
            if growing >= guard.growth_steps {
                return Err(MathError::invalid_input(format!(
                    "Newton iterates diverging near x = {x}"
                )));
            }
        }
        last_residual = fx.abs();

        let slope = finite_at(df(x), x)?;
        if slope.abs() < MIN_DERIVATIVE {
            return Err(MathError::DivisionByZero { value: slope });
        }

        let step = fx / slope;
        if guard.is_some_and(|g| step.abs() > g.max_step) {
            return Err(MathError::invalid_input(format!(
                "Newton step {step:.3e} from x = {x} is out of range"
            )));
        }
        x = finite_at(x - step, x)?;

        if step.abs() < tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: n + 1,
                residual: f(x),
            });
        }
    }

    Err(MathError::convergence_failed(budget, f(x).abs()))
}

fn finite_at(value: f64, x: f64) -> MathResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MathError::NonFinite { x })
    }
}
