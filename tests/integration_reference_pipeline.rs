//! Integration tests for the reference budget-reallocation pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path a host takes: build the reference
//!   optimizer, read channels and baseline budgets, submit per-channel
//!   settings, and read back the published optimum.
//! - Exercise the realistic five-channel reference model over its seeded
//!   156-period dataset rather than toy two-channel fixtures only.
//!
//! Coverage
//! --------
//! - `allocation::Optimizer`:
//!   - `optimize_default` and `optimize_settings` on the reference setup.
//!   - Budget neutrality, bound adherence, no-regression, determinism.
//!   - Net-change targets and infeasible targets with state preservation.
//! - `budget::codec::BudgetCodec`:
//!   - Encode/decode round trip on the reference baseline.
//! - `response::hill_trend::HillTrendModel`:
//!   - Monotonicity of the predicted outcome in each channel's spend.
//!
//! Exclusions
//! ----------
//! - Projection, line-search, and option validation details; these are
//!   covered by unit tests.
//! - Python bindings.
use std::sync::Arc;

use budget_optimizer::{
    allocation::{AllocationError, OptimizationResult, Optimizer, SolveState},
    budget::{
        config::{BudgetConfig, ChannelSetting},
        errors::ConfigError,
        spend::Budget,
    },
    optimization::errors::OptError,
    response::{hill_trend::HillTrendModel, traits::ResponseModel},
};
use ndarray::{Array1, array};

const BASELINE_TOTAL: f64 = 39500.0;

/// Purpose
/// -------
/// Build the reference optimizer, failing the test on construction errors.
fn reference() -> Optimizer<HillTrendModel> {
    Optimizer::reference().expect("reference optimizer should build")
}

/// Purpose
/// -------
/// Host-form settings that start at baseline with symmetric `±bound`
/// fractional bounds on every channel.
///
/// Usage
/// -----
/// - Mirrors what a host UI submits when the user only moves the bound
///   sliders.
fn baseline_settings(
    optimizer: &Optimizer<impl ResponseModel>, bound: f64,
) -> Vec<ChannelSetting> {
    optimizer
        .channels()
        .iter()
        .zip(optimizer.initial_budgets())
        .map(|(channel, spend)| ChannelSetting::new(channel.clone(), spend, -bound, bound))
        .collect()
}

/// Purpose
/// -------
/// Assert that every optimal deviation lies within the given bounds, up to
/// a small numerical slack.
fn assert_within_bounds(result: &OptimizationResult, lower: &Array1<f64>, upper: &Array1<f64>) {
    for (i, &d) in result.optimal_deviation().iter().enumerate() {
        assert!(d >= lower[i] - 1e-9, "deviation {d} below lower bound {}", lower[i]);
        assert!(d <= upper[i] + 1e-9, "deviation {d} above upper bound {}", upper[i]);
    }
}

#[test]
// Purpose
// -------
// The reference optimizer exposes the five configured channels and their
// baseline spend, in canonical order.
fn reference_exposes_channels_and_initial_budgets() {
    let optimizer = reference();

    assert_eq!(optimizer.channels(), ["OLV", "Social", "Display", "Search", "Audio"]);
    assert_eq!(optimizer.initial_budgets(), vec![25000.0, 7000.0, 3000.0, 3500.0, 1000.0]);
    assert_eq!(optimizer.baseline().total(), BASELINE_TOTAL);
    assert_eq!(optimizer.state(), &SolveState::Unsolved);
}

#[test]
// Purpose
// -------
// Default optimization keeps total spend, respects the default ±20% bounds,
// and never predicts less than the baseline budget.
//
// Expect
// ------
// - `Σ optimal = 39500` to 1e-6 relative.
// - Every deviation within [-0.2, 0.2].
// - `objective_total ≥ baseline_total`.
fn default_optimization_is_neutral_bounded_and_no_worse() {
    let mut optimizer = reference();
    let lower = optimizer.default_bounds().lower().clone();
    let upper = optimizer.default_bounds().upper().clone();

    let result = optimizer.optimize_default().expect("default optimization should converge");

    let total = result.optimal_budget().total();
    assert!((total - BASELINE_TOTAL).abs() <= 1e-6 * BASELINE_TOTAL, "total = {total}");
    assert_within_bounds(&result, &lower, &upper);
    let slack = 1e-9 * result.baseline_total().abs();
    assert!(result.objective_total() >= result.baseline_total() - slack);
    assert!(result.uplift() >= -slack);
    assert!(optimizer.state().is_solved());
}

#[test]
// Purpose
// -------
// Published outputs are consistent with each other: contributions and the
// prediction are those of the optimal budget, over every period.
fn published_outputs_describe_the_optimal_budget() {
    let mut optimizer = reference();
    let result = optimizer.optimize_default().expect("default optimization should converge");

    let prediction = optimizer.optimal_prediction().expect("prediction should be published");
    let contribution = optimizer.optimal_contribution().expect("contribution should be published");

    assert_eq!(prediction.periods(), optimizer.dataset().periods());
    let gap = (prediction.total() - result.objective_total()).abs();
    assert!(gap <= 1e-9 * prediction.total().abs());
    assert_eq!(contribution.values().dim(), (optimizer.dataset().periods(), 5));
    assert!(contribution.totals().iter().all(|c| c.is_finite() && *c >= 0.0));
    assert_eq!(optimizer.optimal_budget(), Some(result.optimal_budget()));
}

#[test]
// Purpose
// -------
// Two independent runs with identical inputs give identical results.
fn optimization_is_deterministic() {
    let mut first = reference();
    let mut second = reference();

    let a = first.optimize_default().expect("first run should converge");
    let b = second.optimize_default().expect("second run should converge");

    assert_eq!(a.budget_pairs(), b.budget_pairs());
    assert_eq!(a.optimal_deviation(), b.optimal_deviation());
    assert_eq!(a.diagnostics().iterations, b.diagnostics().iterations);
}

#[test]
// Purpose
// -------
// Host-form settings with a positive net-change target raise total spend by
// exactly that amount.
fn settings_with_net_change_target_move_total_spend() {
    let mut optimizer = reference();
    let settings = baseline_settings(&optimizer, 0.2);

    let result = optimizer.optimize_settings(&settings, 1000.0).expect("net change should solve");

    let total = result.optimal_budget().total();
    assert!((total - (BASELINE_TOTAL + 1000.0)).abs() <= 1e-6 * BASELINE_TOTAL, "total = {total}");
    let bound = Array1::from_elem(5, 0.2);
    assert_within_bounds(&result, &-&bound, &bound);
}

#[test]
// Purpose
// -------
// Settings may arrive in any order; the result matches canonical order.
fn settings_order_does_not_matter() {
    let mut canonical = reference();
    let mut shuffled = reference();
    let settings = baseline_settings(&canonical, 0.1);
    let mut reversed = settings.clone();
    reversed.reverse();

    let a = canonical.optimize_settings(&settings, 0.0).expect("canonical order should solve");
    let b = shuffled.optimize_settings(&reversed, 0.0).expect("reversed order should solve");

    assert_eq!(a.budget_pairs(), b.budget_pairs());
}

#[test]
// Purpose
// -------
// A target beyond what the bounds allow fails as an optimization error and
// leaves the previously published result in place.
//
// Given
// -----
// - ±20% bounds allow at most `0.2 · 39500 = 7900` of extra spend.
//
// Expect
// ------
// - `AllocationError::Optimization(OptError::Infeasible { .. })`.
// - The stored result is the same `Arc` as before the failed call.
fn infeasible_target_keeps_previous_result() {
    let mut optimizer = reference();
    let first = optimizer.optimize_default().expect("default optimization should converge");
    let settings = baseline_settings(&optimizer, 0.2);

    let err = optimizer.optimize_settings(&settings, 10_000.0).unwrap_err();

    assert!(matches!(
        err,
        AllocationError::Optimization(OptError::Infeasible { .. })
    ));
    let kept = optimizer.last_result().expect("previous result should remain published");
    assert!(Arc::ptr_eq(kept, &first));
}

#[test]
// Purpose
// -------
// Malformed host requests are configuration errors raised before solving.
fn malformed_settings_are_configuration_errors() {
    let mut optimizer = reference();
    let mut missing = baseline_settings(&optimizer, 0.2);
    missing.pop();
    let mut inverted = baseline_settings(&optimizer, 0.2);
    inverted[0].lower_bound = 0.3;

    let missing_err = optimizer.optimize_settings(&missing, 0.0).unwrap_err();
    let inverted_err = optimizer.optimize_settings(&inverted, 0.0).unwrap_err();

    assert!(missing_err.is_configuration());
    assert!(inverted_err.is_configuration());
    assert!(!optimizer.state().is_solved());
}

#[test]
// Purpose
// -------
// A zero baseline spend is rejected when the configuration is built.
fn zero_baseline_is_a_configuration_error() {
    let err = BudgetConfig::new([("OLV", 25000.0), ("Audio", 0.0)], None).unwrap_err();

    assert_eq!(err, ConfigError::NonPositiveBaseline { channel: "Audio".to_string(), value: 0.0 });
}

#[test]
// Purpose
// -------
// Decoding then encoding a deviation vector returns it to 1e-9 on the
// reference baseline, and encoding the baseline gives zeros.
fn codec_round_trips_on_reference_baseline() {
    let optimizer = reference();
    let codec = optimizer.codec();
    let deviation = array![0.2, -0.2, 0.05, -0.13, 0.0];

    let budget: Budget = codec.decode(deviation.view()).expect("decode should succeed");
    let back = codec.encode(&budget).expect("encode should succeed");

    for (a, b) in deviation.iter().zip(back.iter()) {
        assert!((a - b).abs() <= 1e-9);
    }
    let at_baseline = codec.encode(optimizer.baseline()).expect("encode should succeed");
    assert_eq!(at_baseline, Array1::<f64>::zeros(5));
}

#[test]
// Purpose
// -------
// Raising any single channel's spend, with everything else fixed, never
// lowers the reference model's predicted total.
fn reference_model_is_monotone_in_each_channel() {
    let optimizer = reference();
    let model = optimizer.model();
    let dataset = optimizer.dataset();
    let base_total = model.predict(dataset).expect("baseline prediction").total();

    for channel in 0..5 {
        let mut multipliers = Array1::ones(5);
        multipliers[channel] = 1.1;
        let scaled = dataset.scaled(multipliers.view()).expect("scaling should succeed");

        let total = model.predict(&scaled).expect("scaled prediction").total();

        assert!(total >= base_total, "channel {channel}: {total} < {base_total}");
    }
}

#[test]
// Purpose
// -------
// Different dataset seeds give different baselines and still solve.
fn reference_with_other_seed_solves() {
    let mut seeded = Optimizer::reference_with_seed(7).expect("seeded optimizer should build");
    let default = reference();

    assert_ne!(seeded.dataset(), default.dataset());
    let result = seeded.optimize_default().expect("seeded run should converge");
    assert!((result.optimal_budget().total() - BASELINE_TOTAL).abs() <= 1e-6 * BASELINE_TOTAL);
}
