//! projected_gradient — argmin-powered maximization over box ∩ hyperplane.
//!
//! Purpose
//! -------
//! Provide the numerical core used by budget reallocation: maximize a smooth
//! objective `f(x)` subject to `lower ≤ x ≤ upper` and an optional linear
//! equality `a·x = b`. Callers implement [`Objective`] and invoke
//! [`maximize`].
//!
//! Key behaviors
//! -------------
//! - [`FeasibleRegion`] validates the constraint set, rejects empty regions
//!   before any solve, and projects exactly onto the region.
//! - [`spg::SpectralProjectedGradient`] is an argmin `Solver` that keeps every
//!   iterate feasible, so bounds and the equality hold on the returned point.
//! - [`adapter::ArgMinAdapter`] turns maximization of `f` into minimization
//!   of `c = -f`, falling back to [`finite_diff`] gradients when the objective
//!   has no analytic gradient.
//! - [`run::run_spg`] executes the solver and normalizes the result into an
//!   [`OptimOutcome`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Only `SolverConverged` produces an [`OptimOutcome`]; iteration caps,
//!   timeouts, and stalled line searches are errors.
//! - Runs are deterministic: no randomness, fixed evaluation order.
//! - Objectives report invalid inputs as [`OptError`] values, not panics.
//!
//! Conventions
//! -----------
//! - Vectors use the aliases [`Point`] and [`Grad`] (`Array1<f64>`).
//! - Gradients returned by [`Objective::grad`] are for `f`, not the cost.
//!
//! Downstream usage
//! ----------------
//! - `allocation::Optimizer` builds a [`FeasibleRegion`] from deviation
//!   bounds and the budget constraint, then calls [`maximize`] with a budget
//!   objective.
//!
//! Testing notes
//! -------------
//! - Unit tests cover projection geometry, solver convergence on quadratics
//!   with active constraints, sign conventions, finite-difference fallbacks,
//!   and the mapping of non-convergent statuses to errors.
//!
//! [`OptError`]: crate::optimization::errors::OptError

pub mod adapter;
pub mod api;
pub mod feasible;
pub mod finite_diff;
pub mod run;
pub mod spg;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::feasible::{FeasibleRegion, LinearEquality};
pub use self::traits::{Objective, OptimOutcome, SolverOptions, Tolerances};
pub use self::types::{
    Cost, DEFAULT_MAX_ITER, DEFAULT_NONMONOTONE_MEM, DEFAULT_TOL_GRAD, FnEvalMap, Grad, Point,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use budget_optimizer::optimization::projected_gradient::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::feasible::{FeasibleRegion, LinearEquality};
    pub use super::traits::{Objective, OptimOutcome, SolverOptions, Tolerances};
    pub use super::types::{Grad, Point};
}
