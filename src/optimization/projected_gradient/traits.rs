//! Public API surface for constrained maximization.
//!
//! - [`Objective`]: trait users implement for the function being maximized.
//! - [`SolverOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`OptimOutcome`]: normalized result returned by the high-level
//!   [`maximize`](super::maximize) API.
//!
//! Convention: we *maximize* a user objective `f(x)` by minimizing the cost
//! `c(x) = -f(x)`. If an analytic gradient is provided, it should be the
//! gradient of the objective (`∇f(x)`); the adapter flips the sign as needed.
use std::time::Duration;

use argmin::core::{TerminationReason, TerminationStatus};

use crate::optimization::{
    errors::{OptError, OptResult},
    projected_gradient::{
        types::{
            DEFAULT_MAX_ITER, DEFAULT_NONMONOTONE_MEM, DEFAULT_TOL_GRAD, FnEvalMap, Grad, Point,
        },
        validation::{validate_solution, validate_value, verify_tol_cost, verify_tol_grad},
    },
};

/// User-implemented objective.
///
/// - `type Data`: per-problem data carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Point, &Data) -> OptResult<f64>`: evaluate `f(x)`.
/// - `check(&Point, &Data) -> OptResult<()>`: validation hook called once on
///   the projected starting point before optimization.
///
/// Optional:
/// - `grad(&Point, &Data) -> OptResult<Grad>`: analytic gradient `∇f(x)`.
///   If not implemented, finite differences are used automatically.
pub trait Objective {
    type Data;

    // Required methods
    fn value(&self, x: &Point, data: &Self::Data) -> OptResult<f64>;
    fn check(&self, x: &Point, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _x: &Point, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances`: stopping rules and iteration limit.
/// - `verbose: bool`: if `true`, attaches an observer (behind the `obs_slog`
///   feature) and prints the initial state.
/// - `memory: usize`: number of recent costs the non-monotone line search
///   compares against (`1` makes it monotone Armijo).
/// - `timeout: Option<Duration>`: opt-in wall-clock limit for the whole run,
///   reported as [`OptError::Timeout`]. Without it a run has no built-in
///   cancellation and stops only on convergence, the iteration cap, or an
///   error.
///
/// Default:
/// - `tols`: `tol_grad = 1e-7`, `tol_cost = None`, `max_iter = 500`
/// - `verbose`: `false`
/// - `memory`: `10`
/// - `timeout`: `None`
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    pub tols: Tolerances,
    pub verbose: bool,
    pub memory: usize,
    pub timeout: Option<Duration>,
}

impl SolverOptions {
    /// Create validated optimizer options.
    ///
    /// `memory = None` uses [`DEFAULT_NONMONOTONE_MEM`].
    ///
    /// # Errors
    /// - [`OptError::InvalidMemory`] if `memory == Some(0)`.
    /// - [`OptError::InvalidTimeout`] for a zero timeout.
    pub fn new(
        tols: Tolerances, verbose: bool, memory: Option<usize>, timeout: Option<Duration>,
    ) -> OptResult<Self> {
        let memory = memory.unwrap_or(DEFAULT_NONMONOTONE_MEM);
        if memory == 0 {
            return Err(OptError::InvalidMemory {
                mem: memory,
                reason: "Line-search memory must be greater than zero.",
            });
        }
        if let Some(limit) = timeout {
            if limit.is_zero() {
                return Err(OptError::InvalidTimeout {
                    secs: limit.as_secs_f64(),
                    reason: "Timeout must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, verbose, memory, timeout })
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::default(),
            verbose: false,
            memory: DEFAULT_NONMONOTONE_MEM,
            timeout: None,
        }
    }
}

/// Stopping rules and iteration limit.
///
/// - `tol_grad`: converge when `‖P(x − ∇c) − x‖∞` falls below this threshold.
/// - `tol_cost`: converge when `|Δc| ≤ tol_cost · max(1, |c|)`.
/// - `max_iter`: hard cap on the number of iterations; reaching it is a
///   failure, not convergence.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { tol_grad: Some(DEFAULT_TOL_GRAD), tol_cost: None, max_iter: Some(DEFAULT_MAX_ITER) }
    }
}

/// Canonical result returned by `maximize`.
///
/// - `x_hat`: best feasible point found.
/// - `value`: objective value `f(x̂)` (not the cost).
/// - `converged`: always `true` for a returned outcome; non-converged runs
///   are reported as errors.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
/// - `projected_grad_norm`: stationarity measure at `x_hat`, if a gradient
///   was available.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub x_hat: Point,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub projected_grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Validation errors for `x_hat` or `value`.
    /// - [`OptError::Timeout`] if the run hit its wall-clock limit.
    /// - [`OptError::NotConverged`] for any other non-convergent status
    ///   (iteration cap, line-search exit, interrupt).
    pub fn new(
        x_hat: Option<Point>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, projected_grad_norm: Option<f64>,
    ) -> OptResult<Self> {
        match &termination {
            TerminationStatus::Terminated(TerminationReason::SolverConverged) => {}
            TerminationStatus::Terminated(TerminationReason::Timeout) => {
                return Err(OptError::Timeout { iterations });
            }
            other => {
                return Err(OptError::NotConverged { status: format!("{other:?}"), iterations });
            }
        }
        let x_hat = validate_solution(x_hat)?;
        validate_value(value)?;
        Ok(Self {
            x_hat,
            value,
            converged: true,
            status: format!("{termination:?}"),
            iterations: iterations as usize,
            fn_evals,
            projected_grad_norm,
        })
    }
}
