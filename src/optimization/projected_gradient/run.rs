//! Execution helper that runs the projected-gradient solver on an objective
//! and returns a crate-friendly [`OptimOutcome`].
use argmin::core::{Executor, Gradient, State};
#[cfg(feature = "obs_slog")]
use argmin::core::CostFunction;
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

use crate::optimization::{
    errors::OptResult,
    projected_gradient::{
        adapter::ArgMinAdapter,
        spg::SpectralProjectedGradient,
        traits::{Objective, OptimOutcome, SolverOptions},
        types::Point,
    },
};

/// Run [`SpectralProjectedGradient`] from `x0` and normalize the result.
///
/// - Attaches a terminal observer when `opts.verbose` (feature `obs_slog`).
/// - Applies `max_iter` from `opts`, and the wall-clock `timeout` when one
///   is set.
/// - Reports the best point seen, its objective value, and the projected
///   gradient norm re-evaluated at that point.
///
/// # Errors
/// - Any error raised during the run (objective, gradient, argmin).
/// - [`OptError::NotConverged`](crate::optimization::errors::OptError::NotConverged)
///   or [`OptError::Timeout`](crate::optimization::errors::OptError::Timeout)
///   when the run stops without converging.
pub fn run_spg<'a, F: Objective>(
    x0: Point, opts: &SolverOptions, problem: ArgMinAdapter<'a, F>,
    solver: SpectralProjectedGradient,
) -> OptResult<OptimOutcome> {
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&x0, &problem)?;
    }
    let region = solver.region().clone();
    let evaluator = problem.clone();

    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(x0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }
    if let Some(limit) = opts.timeout {
        optimizer = optimizer.timeout(limit);
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let x_hat = result.take_best_param().or_else(|| result.take_param());
    let pg_norm = x_hat.as_ref().and_then(|x| {
        evaluator.gradient(x).ok().map(|grad| region.projected_gradient_norm(x, &grad))
    });
    OptimOutcome::new(
        x_hat,
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        pg_norm,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(x0: &Point, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: Objective,
{
    let f0 = -problem.cost(x0)?;
    let g0n = problem.gradient(x0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: f(x0) = {:.6}{}",
        f0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
