//! Published outcome of one successful optimization.
use ndarray::Array1;

use crate::{
    budget::{channels::Channel, spend::Budget},
    optimization::projected_gradient::FnEvalMap,
    response::traits::{ContributionSet, Prediction},
};

/// Solver diagnostics for a converged run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverDiagnostics {
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub projected_grad_norm: Option<f64>,
}

/// Optimal budget with its contributions and prediction.
///
/// Built in full before it is stored, and never mutated afterwards; the
/// optimizer replaces the whole value on the next success.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    optimal_budget: Budget,
    optimal_deviation: Array1<f64>,
    optimal_contribution: ContributionSet,
    optimal_prediction: Prediction,
    objective_total: f64,
    baseline_total: f64,
    diagnostics: SolverDiagnostics,
}

impl OptimizationResult {
    pub(crate) fn new(
        optimal_budget: Budget, optimal_deviation: Array1<f64>,
        optimal_contribution: ContributionSet, optimal_prediction: Prediction,
        objective_total: f64, baseline_total: f64, diagnostics: SolverDiagnostics,
    ) -> Self {
        Self {
            optimal_budget,
            optimal_deviation,
            optimal_contribution,
            optimal_prediction,
            objective_total,
            baseline_total,
            diagnostics,
        }
    }

    pub fn optimal_budget(&self) -> &Budget {
        &self.optimal_budget
    }

    /// Optimal fractional deviations from baseline, in canonical order.
    pub fn optimal_deviation(&self) -> &Array1<f64> {
        &self.optimal_deviation
    }

    pub fn optimal_contribution(&self) -> &ContributionSet {
        &self.optimal_contribution
    }

    pub fn optimal_prediction(&self) -> &Prediction {
        &self.optimal_prediction
    }

    /// Predicted outcome of the optimal budget over the evaluation window.
    pub fn objective_total(&self) -> f64 {
        self.objective_total
    }

    /// Predicted outcome of the baseline budget over the same window.
    pub fn baseline_total(&self) -> f64 {
        self.baseline_total
    }

    /// `objective_total − baseline_total`.
    pub fn uplift(&self) -> f64 {
        self.objective_total - self.baseline_total
    }

    pub fn diagnostics(&self) -> &SolverDiagnostics {
        &self.diagnostics
    }

    /// `(channel, optimal spend)` pairs in canonical order.
    pub fn budget_pairs(&self) -> Vec<(Channel, f64)> {
        self.optimal_budget.to_pairs()
    }

    /// `(channel, total contribution)` pairs in canonical order.
    pub fn contribution_pairs(&self) -> Vec<(Channel, f64)> {
        self.optimal_contribution.to_pairs()
    }
}
