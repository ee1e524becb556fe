//! Configuration for metrics computation.

use folio_math::solvers::SolverConfig;
use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};

/// Default seed for the rate-of-return iteration.
pub const DEFAULT_INITIAL_GUESS: f64 = 0.10;

/// Days per year used to turn day counts into year fractions.
pub const DEFAULT_DAY_COUNT_BASIS: f64 = 365.25;

/// Lowest rate searched when Newton falls back to bracketing.
pub const DEFAULT_LOWER_BOUND: f64 = -0.9999;

/// Highest rate searched when Newton falls back to bracketing (10,000 %).
pub const DEFAULT_UPPER_BOUND: f64 = 100.0;

/// Settings for the XIRR solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XirrConfig {
    /// Starting rate for Newton-Raphson.
    pub initial_guess: f64,

    /// Days per year in the discount exponent.
    pub day_count_basis: f64,

    /// Bracket searched by Brent when Newton fails.
    pub lower_bound: f64,

    /// Upper end of the fallback bracket.
    pub upper_bound: f64,

    /// Tolerance and iteration budget.
    pub solver: SolverConfig,
}

impl Default for XirrConfig {
    fn default() -> Self {
        Self {
            initial_guess: DEFAULT_INITIAL_GUESS,
            day_count_basis: DEFAULT_DAY_COUNT_BASIS,
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
            solver: SolverConfig::default(),
        }
    }
}

impl XirrConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial guess.
    #[must_use]
    pub fn with_initial_guess(mut self, guess: f64) -> Self {
        self.initial_guess = guess;
        self
    }

    /// Sets the day-count basis.
    #[must_use]
    pub fn with_day_count_basis(mut self, basis: f64) -> Self {
        self.day_count_basis = basis;
        self
    }

    /// Sets the fallback bracket.
    #[must_use]
    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Sets the solver tolerance and iteration budget.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Checks that the settings describe a solvable problem.
    pub fn validate(&self) -> MetricsResult<()> {
        if !(self.day_count_basis.is_finite() && self.day_count_basis > 0.0) {
            return Err(MetricsError::invalid_config(format!(
                "day_count_basis must be positive, got {}",
                self.day_count_basis
            )));
        }
        if !(self.lower_bound > -1.0 && self.lower_bound < self.upper_bound) {
            return Err(MetricsError::invalid_config(format!(
                "bounds must satisfy -1 < lower < upper, got ({}, {})",
                self.lower_bound, self.upper_bound
            )));
        }
        if !self.upper_bound.is_finite() {
            return Err(MetricsError::invalid_config("upper_bound must be finite"));
        }
        if !(self.initial_guess.is_finite() && self.initial_guess > -1.0) {
            return Err(MetricsError::invalid_config(format!(
                "initial_guess must be above -1, got {}",
                self.initial_guess
            )));
        }
        if !(self.solver.tolerance > 0.0) || self.solver.max_iterations == 0 {
            return Err(MetricsError::invalid_config(
                "solver needs a positive tolerance and at least one iteration",
            ));
        }
        Ok(())
    }
}

/// Configuration for metrics computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// XIRR solver settings.
    pub xirr: XirrConfig,

    /// Enable parallel per-account computation (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum account count before per-account work is parallelised.
    pub parallel_threshold: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            xirr: XirrConfig::default(),
            parallel: true,
            parallel_threshold: 64,
        }
    }
}

impl MetricsConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always computes sequentially.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the XIRR settings.
    #[must_use]
    pub fn with_xirr(mut self, xirr: XirrConfig) -> Self {
        self.xirr = xirr;
        self
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }

    /// Validates nested settings.
    pub fn validate(&self) -> MetricsResult<()> {
        self.xirr.validate()
    }
}
