//! allocation — budget reallocation on top of the response model and solver.
//!
//! Purpose
//! -------
//! Tie the pieces together: a [`BudgetConfig`](crate::budget::BudgetConfig)
//! supplies the baseline and default bounds, a
//! [`ResponseModel`](crate::response::ResponseModel) scores candidate budgets,
//! and the projected-gradient solver searches deviation space under box
//! bounds and one [`LinearConstraint`].
//!
//! Key behaviors
//! -------------
//! - [`Optimizer`] validates requests, runs the solve, and publishes an
//!   [`OptimizationResult`] atomically through [`SolveState`].
//! - [`BudgetObjective`] maps deviations to a normalized predicted outcome,
//!   with an analytic gradient when the model provides spend sensitivities.
//! - [`AllocationError`] separates configuration failures from optimization
//!   failures.
//!
//! Invariants & assumptions
//! ------------------------
//! - Failed runs never change the published state.
//! - Repeated runs with identical inputs give identical results.
//!
//! Downstream usage
//! ----------------
//! - Hosts build an [`Optimizer`] (or use [`Optimizer::reference`]), read
//!   `channels()` / `initial_budgets()`, call `optimize_settings`, and read
//!   back `optimal_budget()`, `optimal_contribution()`, and
//!   `optimal_prediction()`.

pub mod constraint;
pub mod errors;
pub mod objective;
pub mod optimizer;
pub mod result;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::constraint::LinearConstraint;
pub use self::errors::{AllocationError, AllocationResult};
pub use self::objective::BudgetObjective;
pub use self::optimizer::{Optimizer, SolveState};
pub use self::result::{OptimizationResult, SolverDiagnostics};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use budget_optimizer::allocation::prelude::*;
//
// to import the main allocation surface in a single line.

pub mod prelude {
    pub use super::constraint::LinearConstraint;
    pub use super::errors::{AllocationError, AllocationResult};
    pub use super::optimizer::{Optimizer, SolveState};
    pub use super::result::OptimizationResult;
}
