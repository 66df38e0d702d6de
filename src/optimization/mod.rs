//! optimization — constrained solver stack and unified error surface.
//!
//! Purpose
//! -------
//! Provide the numerical layer behind budget reallocation: an argmin-backed
//! maximizer over box bounds with an optional linear equality, plus a single
//! error/result surface for everything the solver can report.
//!
//! Key behaviors
//! -------------
//! - Expose [`projected_gradient::maximize`] for maximizing a user
//!   [`projected_gradient::Objective`] over a
//!   [`projected_gradient::FeasibleRegion`].
//! - Normalize configuration issues, numerical failures, model failures, and
//!   backend solver errors into [`errors::OptError`] with the alias
//!   [`errors::OptResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Constraint sets are validated (and infeasible ones rejected) before a
//!   solver runs.
//! - A returned outcome always comes from a converged run.
//!
//! Conventions
//! -----------
//! - Solvers maximize `f(x)` by minimizing `c(x) = -f(x)`; outcomes report
//!   `f`.
//!
//! Downstream usage
//! ----------------
//! - `allocation` wraps this layer with budget semantics (deviation
//!   encoding, budget-neutral constraint, response-model objective).

pub mod errors;
pub mod projected_gradient;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use budget_optimizer::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::projected_gradient::prelude::*;
}
