//! Failures reported by the root finders.

use thiserror::Error;

/// Result alias used across `folio-math`.
pub type MathResult<T> = Result<T, MathError>;

/// Why a solver produced no root.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Iteration budget exhausted before reaching tolerance.
    #[error("no convergence within {iterations} iterations, |f(x)| = {residual:.2e}")]
    ConvergenceFailed {
        /// Budget that was spent.
        iterations: u32,
        /// `|f(x)|` at the last iterate.
        residual: f64,
    },

    /// The bracketing interval does not contain a sign change.
    #[error("f({a}) = {fa:.2e} and f({b}) = {fb:.2e} do not bracket a root")]
    InvalidBracket {
        /// Left end.
        a: f64,
        /// Right end.
        b: f64,
        /// `f(a)`.
        fa: f64,
        /// `f(b)`.
        fb: f64,
    },

    /// Derivative vanished, so a Newton step is undefined.
    #[error("derivative too close to zero: {value:.2e}")]
    DivisionByZero {
        /// Derivative at the failing iterate.
        value: f64,
    },

    /// An iterate or function value became NaN or infinite.
    #[error("function not finite at x = {x}")]
    NonFinite {
        /// The point where evaluation broke down.
        x: f64,
    },

    /// Arguments the solver cannot work with, or a Newton run abandoned early.
    #[error("{reason}")]
    InvalidInput {
        /// What was wrong.
        reason: String,
    },
}

impl MathError {
    /// Builds [`MathError::ConvergenceFailed`].
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Builds [`MathError::InvalidInput`].
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
