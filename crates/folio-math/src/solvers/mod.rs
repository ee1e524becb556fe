//! Root finders for rate-of-return equations.
//!
//! - [`newton_raphson`]: quadratic convergence from a good seed, needs `f'`
//! - [`brent`]: bracketing; converges whenever `f(a)` and `f(b)` differ in sign
//! - [`hybrid`]: Newton first, Brent on the supplied (or discovered) bracket
//!   when Newton stalls or leaves the function's domain
//!
//! Each returns a [`SolverResult`] with the root, the iterations spent and the
//! residual `f(root)`, or a [`MathError`](crate::MathError) saying why no root
//! was produced.
//!
//! # Example: Internal Rate of Return
//!
//! ```rust
//! use folio_math::solvers::{hybrid, SolverConfig};
//!
//! // Invest 100 today, receive 60 after one year and 60 after two years.
//! let npv = |r: f64| -100.0 + 60.0 / (1.0 + r) + 60.0 / (1.0 + r).powi(2);
//! let d_npv = |r: f64| -60.0 / (1.0 + r).powi(2) - 120.0 / (1.0 + r).powi(3);
//!
//! let result = hybrid(npv, d_npv, 0.10, Some((-0.99, 1.0)), &SolverConfig::default()).unwrap();
//! assert!((result.root - 0.130_662).abs() < 1e-5);
//! ```

mod brent;
mod hybrid;
mod newton;

pub use brent::brent;
pub use hybrid::hybrid;
pub use newton::newton_raphson;

use serde::{Deserialize, Serialize};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Derivatives smaller than this are treated as zero by Newton steps.
pub(crate) const MIN_DERIVATIVE: f64 = 1e-15;

/// Stopping rules shared by all solvers.
///
/// `tolerance` bounds both the residual and the step size; whichever is met
/// first ends the iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Convergence threshold.
    pub tolerance: f64,
    /// Iteration budget.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a configuration from explicit limits.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// A converged root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// Location of the root.
    pub root: f64,
    /// Iterations spent.
    pub iterations: u32,
    /// `f(root)`.
    pub residual: f64,
}
