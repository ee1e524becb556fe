//! # Folio Math
//!
//! Numerical building blocks for the Folio portfolio metrics library.
//!
//! This crate provides:
//!
//! - **Solvers**: Root-finding algorithms (Newton-Raphson, Brent, and a
//!   Newton-with-Brent-fallback hybrid) used to solve for internal rates of
//!   return.
//!
//! ## Design Philosophy
//!
//! - **Explicit failure**: Every solver returns a [`MathResult`]; callers decide
//!   how to degrade when no root can be found.
//! - **Closures in, statistics out**: Solvers take plain `Fn(f64) -> f64`
//!   closures and report the root together with iteration count and residual.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::solvers::{brent, hybrid, newton_raphson, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
