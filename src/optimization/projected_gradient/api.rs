//! High-level entry point for maximizing an [`Objective`] over a
//! [`FeasibleRegion`].
//!
//! Validates and projects the starting point, runs the user's `check` hook,
//! wraps the objective in an [`ArgMinAdapter`] (which *minimizes* `-f(x)`),
//! and delegates to [`run_spg`].
use crate::optimization::{
    errors::OptResult,
    projected_gradient::{
        adapter::ArgMinAdapter,
        feasible::FeasibleRegion,
        run::run_spg,
        spg::SpectralProjectedGradient,
        traits::{Objective, OptimOutcome, SolverOptions},
        types::Point,
        validation::validate_start,
    },
};

/// Maximize `f` over `region`, starting from `x0`.
///
/// `x0` may lie outside the region; it is projected first.
///
/// # Errors
/// - [`OptError::DimensionMismatch`] / [`OptError::InvalidStartPoint`] for
///   a malformed `x0`.
/// - Errors from `f.check` on the projected start.
/// - Any run error, including non-convergence.
///
/// [`OptError::DimensionMismatch`]: crate::optimization::errors::OptError::DimensionMismatch
/// [`OptError::InvalidStartPoint`]: crate::optimization::errors::OptError::InvalidStartPoint
pub fn maximize<F: Objective>(
    f: &F, x0: Point, data: &F::Data, region: &FeasibleRegion, opts: &SolverOptions,
) -> OptResult<OptimOutcome> {
    validate_start(&x0, region.dim())?;
    let x0 = region.project(&x0);
    f.check(&x0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    let solver = SpectralProjectedGradient::new(
        region.clone(),
        opts.memory,
        opts.tols.tol_grad,
        opts.tols.tol_cost,
    );
    run_spg(x0, opts, problem, solver)
}
