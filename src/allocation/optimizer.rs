//! allocation::optimizer — budget reallocation over a response model.
//!
//! Purpose
//! -------
//! Orchestrate one constrained solve: encode the request in deviation space,
//! build the feasible region from bounds and the linear constraint, maximize
//! the model's predicted outcome, decode the winner, and publish the result.
//!
//! Key behaviors
//! -------------
//! - [`Optimizer::solve`] is pure: it returns a fresh [`OptimizationResult`]
//!   and never touches stored state.
//! - [`Optimizer::optimize`] is `solve` followed by a single assignment of
//!   [`SolveState::Solved`]; on any error the previous state is left as is.
//! - [`Optimizer::optimize_settings`] accepts host rows (starting spend and
//!   bounds per channel, any order) plus a net-change target.
//!
//! Invariants & assumptions
//! ------------------------
//! - Model, configuration, and dataset share one channel set; every vector
//!   handled here is indexed by its canonical order.
//! - Configuration problems are reported before the solver runs; infeasible
//!   constraint sets are rejected before iterating.
//! - The model, baseline, and dataset are never mutated.
//!
//! Conventions
//! -----------
//! - Deviation `dᵢ = (budgetᵢ − baselineᵢ) / baselineᵢ`; bounds are on `d`.
//! - Stored results are `Arc` snapshots, so a reader holding one keeps a
//!   consistent view after later runs.
use std::{ops::Range, sync::Arc};

use ndarray::{Array1, ArrayView1};

use crate::{
    allocation::{
        constraint::LinearConstraint,
        errors::AllocationResult,
        objective::BudgetObjective,
        result::{OptimizationResult, SolverDiagnostics},
    },
    budget::{
        bounds::Bounds,
        channels::{Channel, ChannelSet},
        codec::BudgetCodec,
        config::{BudgetConfig, ChannelSetting, assemble_settings},
        errors::ConfigError,
        spend::Budget,
    },
    optimization::projected_gradient::{FeasibleRegion, SolverOptions, maximize},
    response::{
        dataset::ResponseDataset,
        hill_trend::HillTrendModel,
        reference::{REFERENCE_SEED, reference_config, reference_dataset, reference_model},
        traits::{ContributionSet, Prediction, ResponseModel, verify_window},
    },
};

/// Whether the optimizer holds a published result.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SolveState {
    #[default]
    Unsolved,
    Solved(Arc<OptimizationResult>),
}

impl SolveState {
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveState::Solved(_))
    }

    pub fn result(&self) -> Option<&Arc<OptimizationResult>> {
        match self {
            SolveState::Solved(result) => Some(result),
            SolveState::Unsolved => None,
        }
    }
}

/// Budget optimizer bound to one model, baseline, and baseline dataset.
#[derive(Debug, Clone)]
pub struct Optimizer<M: ResponseModel> {
    model: M,
    config: BudgetConfig,
    codec: BudgetCodec,
    dataset: ResponseDataset,
    options: SolverOptions,
    window: Option<Range<usize>>,
    state: SolveState,
}

impl<M: ResponseModel> Optimizer<M> {
    /// Bind an optimizer.
    ///
    /// # Errors
    /// [`AllocationError::Configuration`](super::AllocationError::Configuration)
    /// if the model, configuration, and dataset disagree on channels.
    pub fn new(model: M, config: BudgetConfig, dataset: ResponseDataset) -> AllocationResult<Self> {
        model.channels().ensure_same(config.channels())?;
        model.channels().ensure_same(dataset.channels())?;
        let codec = BudgetCodec::new(config.baseline().clone())?;
        Ok(Self {
            model,
            config,
            codec,
            dataset,
            options: SolverOptions::default(),
            window: None,
            state: SolveState::Unsolved,
        })
    }

    /// Replace the solver options used by later runs.
    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Restrict the objective to the half-open period range `window`.
    ///
    /// `start..end` excludes period `end`. An inclusive date slice
    /// `[start, end]` maps to `start..end + 1`; passing `start..end` drops its
    /// last period.
    ///
    /// # Errors
    /// [`ModelError::InvalidPeriodWindow`](crate::response::errors::ModelError::InvalidPeriodWindow)
    /// for an empty range or one past the dataset.
    pub fn with_period_window(mut self, window: Range<usize>) -> AllocationResult<Self> {
        verify_window(&window, self.dataset.periods())?;
        self.window = Some(window);
        Ok(self)
    }

    // ---- Solving ----

    /// Solve without publishing.
    ///
    /// `init_deviation` need not be feasible; it is projected onto the region
    /// first.
    ///
    /// # Errors
    /// - Configuration: channel-set mismatch in `bounds` or `constraint`,
    ///   wrong length or non-finite `init_deviation`.
    /// - Optimization: infeasible constraint set, non-convergence, timeout,
    ///   or a non-finite objective.
    pub fn solve(
        &self, init_deviation: ArrayView1<'_, f64>, bounds: &Bounds, constraint: &LinearConstraint,
    ) -> AllocationResult<OptimizationResult> {
        let channels = self.codec.channels();
        channels.ensure_same(bounds.channels())?;
        channels.ensure_same(constraint.channels())?;
        channels.ensure_len(init_deviation.len())?;
        if let Some((index, &value)) = init_deviation.iter().enumerate().find(|(_, d)| !d.is_finite())
        {
            return Err(ConfigError::NonFiniteDeviation { index, value }.into());
        }

        let region = FeasibleRegion::new(
            bounds.lower().clone(),
            bounds.upper().clone(),
            Some(constraint.to_equality()?),
        )?;
        let objective =
            BudgetObjective::new(&self.model, &self.codec, &self.dataset, self.window.clone())?;
        let outcome =
            maximize(&objective, init_deviation.to_owned(), &self.dataset, &region, &self.options)?;

        let optimal_budget = self.codec.decode(outcome.x_hat.view())?;
        let scaled = objective.scaled_dataset(&outcome.x_hat, &self.dataset)?;
        let optimal_contribution = self.model.contributions(&scaled)?;
        let optimal_prediction = self.model.predict(&scaled)?;
        let objective_total = objective.window_total(&optimal_prediction)?;
        let baseline_total = objective.window_total(&self.model.predict(&self.dataset)?)?;

        Ok(OptimizationResult::new(
            optimal_budget,
            outcome.x_hat,
            optimal_contribution,
            optimal_prediction,
            objective_total,
            baseline_total,
            SolverDiagnostics {
                status: outcome.status,
                iterations: outcome.iterations,
                fn_evals: outcome.fn_evals,
                projected_grad_norm: outcome.projected_grad_norm,
            },
        ))
    }

    /// Solve and publish on success. On error the previous state is kept.
    ///
    /// # Errors
    /// See [`Optimizer::solve`].
    pub fn optimize(
        &mut self, init_deviation: ArrayView1<'_, f64>, bounds: &Bounds,
        constraint: &LinearConstraint,
    ) -> AllocationResult<Arc<OptimizationResult>> {
        let result = Arc::new(self.solve(init_deviation, bounds, constraint)?);
        self.state = SolveState::Solved(Arc::clone(&result));
        Ok(result)
    }

    /// Start at baseline with the configured default bounds under budget
    /// neutrality.
    ///
    /// # Errors
    /// See [`Optimizer::solve`].
    pub fn optimize_default(&mut self) -> AllocationResult<Arc<OptimizationResult>> {
        let init = Array1::zeros(self.codec.channels().len());
        let bounds = self.config.default_bounds().clone();
        let constraint = LinearConstraint::budget_neutral(self.codec.baseline());
        self.optimize(init.view(), &bounds, &constraint)
    }

    /// Host form: starting spend and bounds per channel, plus the required
    /// net change in total spend (`0.0` for budget neutrality).
    ///
    /// # Errors
    /// - Configuration: unknown, duplicate, or missing channels; invalid
    ///   spend or bounds; non-finite target.
    /// - See [`Optimizer::solve`].
    pub fn optimize_settings(
        &mut self, settings: &[ChannelSetting], target: f64,
    ) -> AllocationResult<Arc<OptimizationResult>> {
        let (start, bounds) = assemble_settings(self.codec.channels(), settings)?;
        let init = self.codec.encode(&start)?;
        let constraint = LinearConstraint::net_change(self.codec.baseline(), target)?;
        self.optimize(init.view(), &bounds, &constraint)
    }

    // ---- Accessors ----

    /// Channels in canonical order.
    pub fn channels(&self) -> &[Channel] {
        self.codec.channels().names()
    }

    pub fn channel_set(&self) -> &ChannelSet {
        self.codec.channels()
    }

    /// Baseline spend in canonical order.
    pub fn initial_budgets(&self) -> Vec<f64> {
        self.codec.baseline().spend().to_vec()
    }

    pub fn baseline(&self) -> &Budget {
        self.codec.baseline()
    }

    pub fn codec(&self) -> &BudgetCodec {
        &self.codec
    }

    pub fn default_bounds(&self) -> &Bounds {
        self.config.default_bounds()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn dataset(&self) -> &ResponseDataset {
        &self.dataset
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    pub fn state(&self) -> &SolveState {
        &self.state
    }

    pub fn last_result(&self) -> Option<&Arc<OptimizationResult>> {
        self.state.result()
    }

    pub fn optimal_budget(&self) -> Option<&Budget> {
        self.last_result().map(|r| r.optimal_budget())
    }

    pub fn optimal_contribution(&self) -> Option<&ContributionSet> {
        self.last_result().map(|r| r.optimal_contribution())
    }

    pub fn optimal_prediction(&self) -> Option<&Prediction> {
        self.last_result().map(|r| r.optimal_prediction())
    }
}

impl Optimizer<HillTrendModel> {
    /// Optimizer over the reference model, configuration, and seeded
    /// baseline dataset.
    ///
    /// # Errors
    /// Only if the built-in reference setup is inconsistent.
    pub fn reference() -> AllocationResult<Self> {
        Self::reference_with_seed(REFERENCE_SEED)
    }

    /// Same as [`Optimizer::reference`] with a different dataset seed.
    ///
    /// # Errors
    /// Only if the built-in reference setup is inconsistent.
    pub fn reference_with_seed(seed: u64) -> AllocationResult<Self> {
        let model = reference_model()?;
        let config = reference_config()?;
        let dataset = reference_dataset(seed)?;
        Self::new(model, config, dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        allocation::errors::AllocationError,
        optimization::{errors::OptError, projected_gradient::Tolerances},
        response::{
            errors::{ModelError, ModelResult},
            hill_trend::{ChannelCurve, TREND_COVARIATE},
        },
    };
    use ndarray::{Array2, array};
    use std::time::Duration;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The two-channel reallocation scenario with a known corner optimum.
    // - Zero-width bounds, infeasible targets, and configuration failures.
    // - Publication semantics of `SolveState`.
    //
    // They intentionally DO NOT cover:
    // - The reference model end to end (see tests/ integration suite).
    // -------------------------------------------------------------------------

    /// Channels A and B at 100 each over a single period; B's curve has three
    /// times A's weight, so B is more marginally efficient at baseline.
    fn two_channel() -> Optimizer<HillTrendModel> {
        let model = HillTrendModel::new(
            [("A", ChannelCurve::new(50.0, 1.0, 0.2)), ("B", ChannelCurve::new(50.0, 1.0, 0.6))],
            0.0,
            1000.0,
        )
        .unwrap();
        let config = BudgetConfig::new([("A", 100.0), ("B", 100.0)], None).unwrap();
        let dataset =
            ResponseDataset::new(model.channels().clone(), array![[100.0, 100.0]], Default::default())
                .unwrap()
                .with_covariate(TREND_COVARIATE, array![0.0])
                .unwrap();
        Optimizer::new(model, config, dataset).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Spend moves from the less efficient channel to the more efficient one
    // until the bounds bind, keeping the total fixed.
    //
    // Given
    // -----
    // - A = B = 100, bounds ±0.2, budget-neutral constraint.
    //
    // Expect
    // ------
    // - A → 80, B → 120, prediction above baseline.
    fn optimize_shifts_spend_toward_efficient_channel() {
        let mut optimizer = two_channel();

        let result = optimizer.optimize_default().unwrap();
        let budget = result.optimal_budget();

        assert!((budget.get("A").unwrap() - 80.0).abs() < 1e-6);
        assert!((budget.get("B").unwrap() - 120.0).abs() < 1e-6);
        assert!((budget.total() - 200.0).abs() < 1e-9);
        assert!(result.objective_total() > result.baseline_total());
        assert!(result.uplift() > 0.0);
        assert!(optimizer.state().is_solved());
    }

    #[test]
    // Purpose
    // -------
    // Zero-width bounds pin the optimum to the baseline budget.
    fn zero_width_bounds_return_baseline() {
        let mut optimizer = two_channel();
        let bounds = Bounds::fixed(optimizer.channel_set());
        let constraint = LinearConstraint::budget_neutral(optimizer.baseline());

        let result = optimizer.optimize(array![0.1, -0.1].view(), &bounds, &constraint).unwrap();

        assert_eq!(result.optimal_budget(), optimizer.baseline());
        assert_eq!(result.diagnostics().iterations, 0);
    }

    #[test]
    // Purpose
    // -------
    // An unreachable target fails as an optimization error and leaves the
    // previously published result untouched.
    //
    // Given
    // -----
    // - A first successful run.
    // - Then bounds [0.1, 0.2] for both channels with budget neutrality.
    //
    // Expect
    // ------
    // - `AllocationError::Optimization(Infeasible)`; state still holds the
    //   first result.
    fn infeasible_target_keeps_previous_result() {
        let mut optimizer = two_channel();
        let first = optimizer.optimize_default().unwrap();
        let bounds = Bounds::from_pairs(
            optimizer.channel_set(),
            [("A", (0.1, 0.2)), ("B", (0.1, 0.2))],
        )
        .unwrap();
        let constraint = LinearConstraint::budget_neutral(optimizer.baseline());

        let err = optimizer.optimize(array![0.0, 0.0].view(), &bounds, &constraint).unwrap_err();

        assert!(matches!(err, AllocationError::Optimization(OptError::Infeasible { .. })));
        assert!(Arc::ptr_eq(optimizer.last_result().unwrap(), &first));
    }

    #[test]
    fn infeasible_target_on_fresh_optimizer_stays_unsolved() {
        let mut optimizer = two_channel();
        let settings =
            [ChannelSetting::new("A", 100.0, -0.1, 0.1), ChannelSetting::new("B", 100.0, -0.1, 0.1)];

        let err = optimizer.optimize_settings(&settings, 100.0).unwrap_err();

        assert!(err.is_optimization());
        assert_eq!(optimizer.state(), &SolveState::Unsolved);
        assert!(optimizer.optimal_budget().is_none());
    }

    #[test]
    // Purpose
    // -------
    // Host settings are accepted in any order and a net-change target moves
    // total spend by exactly that amount.
    fn optimize_settings_applies_net_change_target() {
        let mut optimizer = two_channel();
        let settings = [
            ChannelSetting::new("B", 100.0, -0.2, 0.2),
            ChannelSetting::new("A", 100.0, -0.2, 0.2),
        ];

        let result = optimizer.optimize_settings(&settings, 10.0).unwrap();

        assert!((result.optimal_budget().total() - 210.0).abs() < 1e-9);
        assert!((result.optimal_budget().get("B").unwrap() - 120.0).abs() < 1e-6);
    }

    #[test]
    fn configuration_errors_are_reported_before_solving() {
        let mut optimizer = two_channel();
        let foreign = ChannelSet::new(["B", "A"]).unwrap();
        let foreign_bounds = Bounds::symmetric(&foreign, 0.2).unwrap();
        let bounds = optimizer.default_bounds().clone();
        let constraint = LinearConstraint::budget_neutral(optimizer.baseline());

        assert!(
            optimizer
                .optimize(array![0.0, 0.0].view(), &foreign_bounds, &constraint)
                .unwrap_err()
                .is_configuration()
        );
        assert_eq!(
            optimizer.optimize(array![0.0].view(), &bounds, &constraint).unwrap_err(),
            AllocationError::Configuration(ConfigError::LengthMismatch { expected: 2, actual: 1 })
        );
        assert!(matches!(
            optimizer.optimize_settings(&[ChannelSetting::new("A", 100.0, -0.2, 0.2)], 0.0),
            Err(AllocationError::Configuration(ConfigError::MissingChannel { .. }))
        ));
        assert_eq!(optimizer.state(), &SolveState::Unsolved);
    }

    #[test]
    fn new_rejects_mismatched_configuration() {
        let model =
            HillTrendModel::new([("A", ChannelCurve::new(1.0, 1.0, 0.1))], 0.0, 1.0).unwrap();
        let config = BudgetConfig::new([("Z", 10.0)], None).unwrap();
        let dataset =
            ResponseDataset::new(model.channels().clone(), array![[1.0]], Default::default())
                .unwrap();

        assert!(matches!(
            Optimizer::new(model, config, dataset),
            Err(AllocationError::Configuration(ConfigError::ChannelSetMismatch { .. }))
        ));
    }

    #[test]
    // Purpose
    // -------
    // A period window restricts the maximized total to the selected periods
    // while the published prediction still covers every period.
    fn period_window_restricts_objective() {
        let base = two_channel();
        let dataset = ResponseDataset::new(
            base.channel_set().clone(),
            array![[100.0, 100.0], [50.0, 50.0], [100.0, 100.0]],
            Default::default(),
        )
        .unwrap()
        .with_covariate(TREND_COVARIATE, array![0.0, 0.0, 0.0])
        .unwrap();
        let make = || {
            Optimizer::new(base.model().clone(), base.config.clone(), dataset.clone()).unwrap()
        };

        let mut windowed = make().with_period_window(1..3).unwrap();
        let result = windowed.optimize_default().unwrap();
        let prediction = result.optimal_prediction();

        let expected = prediction.window_total(&(1..3)).unwrap();
        assert!((result.objective_total() - expected).abs() < 1e-9);
        assert!(result.objective_total() < prediction.total());
        assert_eq!(prediction.periods(), 3);

        let first_only = make().with_period_window(0..1).unwrap().optimize_default().unwrap();
        let series = first_only.optimal_prediction().series();
        assert!((first_only.objective_total() - series[0]).abs() < 1e-9);
        assert_eq!(
            make().with_period_window(1..1).unwrap_err(),
            AllocationError::Model(ModelError::InvalidPeriodWindow { start: 1, end: 1, periods: 3 })
        );
        assert_eq!(
            make().with_period_window(2..5).unwrap_err(),
            AllocationError::Model(ModelError::InvalidPeriodWindow { start: 2, end: 5, periods: 3 })
        );
    }

    #[test]
    fn with_options_replaces_solver_options() {
        let tols = Tolerances::new(Some(1e-9), None, Some(50)).unwrap();
        let options = SolverOptions::new(tols, false, Some(1), None).unwrap();

        let mut optimizer = two_channel().with_options(options.clone());
        let result = optimizer.optimize_default().unwrap();

        assert_eq!(optimizer.options(), &options);
        assert!((result.optimal_budget().get("B").unwrap() - 120.0).abs() < 1e-6);
    }

    /// `HillTrendModel` that takes a few milliseconds per prediction.
    struct SlowModel(HillTrendModel);

    impl ResponseModel for SlowModel {
        fn channels(&self) -> &ChannelSet {
            self.0.channels()
        }

        fn predict(&self, data: &ResponseDataset) -> ModelResult<Prediction> {
            std::thread::sleep(Duration::from_millis(3));
            self.0.predict(data)
        }

        fn contributions(&self, data: &ResponseDataset) -> ModelResult<ContributionSet> {
            self.0.contributions(data)
        }

        fn spend_sensitivity(&self, data: &ResponseDataset) -> ModelResult<Array2<f64>> {
            self.0.spend_sensitivity(data)
        }
    }

    #[test]
    // Purpose
    // -------
    // A run that hits the wall-clock limit fails as a timeout and publishes
    // nothing.
    //
    // Expect
    // ------
    // - `AllocationError::Optimization(OptError::Timeout { .. })`.
    // - State stays `Unsolved`; no budget, prediction, or result readable.
    fn timeout_fails_without_publishing() {
        let base = two_channel();
        let options = SolverOptions::new(
            Tolerances::default(),
            false,
            None,
            Some(Duration::from_millis(1)),
        )
        .unwrap();
        let mut optimizer = Optimizer::new(
            SlowModel(base.model().clone()),
            base.config.clone(),
            base.dataset().clone(),
        )
        .unwrap()
        .with_options(options);

        let err = optimizer.optimize_default().unwrap_err();

        assert!(matches!(err, AllocationError::Optimization(OptError::Timeout { .. })));
        assert_eq!(optimizer.state(), &SolveState::Unsolved);
        assert!(optimizer.last_result().is_none());
        assert!(optimizer.optimal_budget().is_none());
        assert!(optimizer.optimal_prediction().is_none());
    }

    #[test]
    fn accessors_follow_canonical_order() {
        let optimizer = Optimizer::reference().unwrap();

        assert_eq!(optimizer.channels(), ["OLV", "Social", "Display", "Search", "Audio"]);
        assert_eq!(optimizer.initial_budgets(), vec![25000.0, 7000.0, 3000.0, 3500.0, 1000.0]);
        assert!(optimizer.last_result().is_none());
    }
}
