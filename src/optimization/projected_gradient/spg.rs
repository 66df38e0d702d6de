//! projected_gradient::spg — spectral projected gradient as an `argmin` solver.
//!
//! Purpose
//! -------
//! Minimize a smooth cost over a [`FeasibleRegion`] (box ∩ optional
//! hyperplane). argmin ships no solver for general linear constraints, so
//! this module plugs one into its `Solver` trait and reuses the executor,
//! observers, counters, and termination plumbing.
//!
//! Key behaviors
//! -------------
//! - Every iterate is feasible: the start is projected in `init`, and each
//!   step moves along `d = P(x − λ∇c) − x` with `α ∈ (0, 1]`, a convex
//!   combination of two feasible points.
//! - `λ` is the Barzilai–Borwein step `sᵀs / sᵀy`, clamped to
//!   `[STEP_MIN, STEP_MAX]`.
//! - Steps are accepted by a non-monotone Armijo test against the largest of
//!   the last `memory` costs, backtracking with safeguarded quadratic
//!   interpolation.
//!
//! Termination
//! -----------
//! - `SolverConverged` when `‖P(x − ∇c) − x‖∞ ≤ tol_grad`, or when the
//!   relative cost change falls below `tol_cost`.
//! - If the line search cannot make progress before either rule holds, the
//!   run exits with `SolverExit("line search stalled")`. The configured
//!   tolerances are never loosened.
use std::collections::VecDeque;

use argmin::core::{
    CostFunction, Error, Gradient, KV, Problem, Solver, TerminationReason, TerminationStatus,
};

use crate::optimization::{
    errors::OptError,
    projected_gradient::{
        feasible::FeasibleRegion,
        types::{Cost, Grad, Point, SpgState},
    },
};

const STEP_MIN: f64 = 1e-10;
const STEP_MAX: f64 = 1e10;
/// Sufficient-decrease constant of the Armijo test.
const ARMIJO_GAMMA: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 40;
/// Safeguard interval for interpolated step lengths, as fractions of the
/// current step.
const INTERP_LOW: f64 = 0.1;
const INTERP_HIGH: f64 = 0.9;

/// `SolverExit` message when no step passes the Armijo test.
pub const LINE_SEARCH_STALLED: &str = "line search stalled";

/// Spectral projected gradient solver over a [`FeasibleRegion`].
#[derive(Debug, Clone)]
pub struct SpectralProjectedGradient {
    region: FeasibleRegion,
    memory: usize,
    tol_grad: Option<f64>,
    tol_cost: Option<f64>,
    step: f64,
    history: VecDeque<Cost>,
    pg_norm: f64,
    last_cost_change: Option<f64>,
    stalled: bool,
}

impl SpectralProjectedGradient {
    /// Build a solver over `region`. `memory` must be at least 1; the public
    /// entry point validates it through `SolverOptions`.
    pub fn new(
        region: FeasibleRegion, memory: usize, tol_grad: Option<f64>, tol_cost: Option<f64>,
    ) -> Self {
        Self {
            region,
            memory: memory.max(1),
            tol_grad,
            tol_cost,
            step: 1.0,
            history: VecDeque::with_capacity(memory.max(1)),
            pg_norm: f64::INFINITY,
            last_cost_change: None,
            stalled: false,
        }
    }

    pub fn region(&self) -> &FeasibleRegion {
        &self.region
    }

    fn record_cost(&mut self, cost: Cost) {
        if self.history.len() == self.memory {
            self.history.pop_front();
        }
        self.history.push_back(cost);
    }

    fn reference_cost(&self, current: Cost) -> Cost {
        self.history.iter().copied().fold(current, f64::max)
    }
}

fn not_initialized(what: &'static str) -> Error {
    OptError::MissingState { what }.into()
}

impl<O> Solver<O, SpgState> for SpectralProjectedGradient
where
    O: CostFunction<Param = Point, Output = Cost> + Gradient<Param = Point, Gradient = Grad>,
{
    const NAME: &'static str = "Spectral projected gradient";

    fn init(
        &mut self, problem: &mut Problem<O>, mut state: SpgState,
    ) -> Result<(SpgState, Option<KV>), Error> {
        let x0 = state.take_param().ok_or_else(|| not_initialized("initial parameter"))?;
        let x = self.region.project(&x0);
        let cost = problem.cost(&x)?;
        let grad = problem.gradient(&x)?;

        self.pg_norm = self.region.projected_gradient_norm(&x, &grad);
        self.step = if self.pg_norm > 0.0 {
            (1.0 / self.pg_norm).clamp(STEP_MIN, STEP_MAX)
        } else {
            1.0
        };
        self.history.clear();
        self.record_cost(cost);
        self.last_cost_change = None;
        self.stalled = false;

        Ok((state.param(x).cost(cost).gradient(grad), None))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, mut state: SpgState,
    ) -> Result<(SpgState, Option<KV>), Error> {
        let x = state.take_param().ok_or_else(|| not_initialized("parameter"))?;
        let g = state.take_gradient().ok_or_else(|| not_initialized("gradient"))?;
        let cost = state.get_cost();

        let direction = &self.region.project(&(&x - &(&g * self.step))) - &x;
        let slope = g.dot(&direction);
        let reference = self.reference_cost(cost);

        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..MAX_BACKTRACKS {
            let candidate = &x + &(&direction * alpha);
            let candidate_cost = problem.cost(&candidate)?;
            if candidate_cost <= reference + ARMIJO_GAMMA * alpha * slope {
                accepted = Some((candidate, candidate_cost));
                break;
            }
            let curvature = 2.0 * (candidate_cost - cost - alpha * slope);
            let interpolated =
                if curvature > 0.0 { -slope * alpha * alpha / curvature } else { f64::NAN };
            alpha = if interpolated >= INTERP_LOW * alpha && interpolated <= INTERP_HIGH * alpha {
                interpolated
            } else {
                0.5 * alpha
            };
        }

        let Some((x_new, cost_new)) = accepted else {
            self.stalled = true;
            return Ok((state.param(x).gradient(g), None));
        };

        let g_new = problem.gradient(&x_new)?;
        let s = &x_new - &x;
        let y = &g_new - &g;
        let sty = s.dot(&y);
        self.step = if sty > 0.0 { (s.dot(&s) / sty).clamp(STEP_MIN, STEP_MAX) } else { STEP_MAX };

        self.pg_norm = self.region.projected_gradient_norm(&x_new, &g_new);
        self.last_cost_change = Some(cost - cost_new);
        self.record_cost(cost_new);

        Ok((state.param(x_new).cost(cost_new).gradient(g_new), None))
    }

    fn terminate(&mut self, state: &SpgState) -> TerminationStatus {
        let converged = TerminationStatus::Terminated(TerminationReason::SolverConverged);
        if self.pg_norm == 0.0 || self.tol_grad.is_some_and(|tol| self.pg_norm <= tol) {
            return converged;
        }
        if let (Some(tol), Some(change)) = (self.tol_cost, self.last_cost_change) {
            if change.abs() <= tol * state.get_cost().abs().max(1.0) {
                return converged;
            }
        }
        if self.stalled {
            return TerminationStatus::Terminated(TerminationReason::SolverExit(
                LINE_SEARCH_STALLED.to_string(),
            ));
        }
        TerminationStatus::NotTerminated
    }
}
