//! Budget objective: predicted outcome as a function of the deviation vector.
//!
//! For a deviation vector `d`, every channel's baseline spend series is scaled
//! by `1 + dᵢ` (the decoded budget over the baseline budget) and the model's
//! prediction is summed over the evaluation window. The value is divided by
//! the magnitude of the baseline prediction so the solver works with costs
//! near 1 regardless of the outcome's units.
//!
//! With `spendₜᵢ = baseₜᵢ · (1 + dᵢ)`, the analytic gradient is
//! `∂f/∂dᵢ = Σₜ sensₜᵢ · baseₜᵢ / |f₀|`, where `sens` is the model's
//! [`spend_sensitivity`](ResponseModel::spend_sensitivity). Models without it
//! fall back to finite differences.
use std::ops::Range;

use ndarray::{Array1, Axis, s};

use crate::{
    budget::codec::BudgetCodec,
    optimization::{
        errors::{OptError, OptResult},
        projected_gradient::{Grad, Objective, Point},
    },
    response::{
        dataset::ResponseDataset,
        errors::{ModelError, ModelResult},
        traits::{Prediction, ResponseModel, verify_window},
    },
};

/// Normalized predicted outcome over a window, as an [`Objective`] whose data
/// is the baseline dataset.
#[derive(Debug)]
pub struct BudgetObjective<'a, M: ResponseModel> {
    model: &'a M,
    codec: &'a BudgetCodec,
    window: Range<usize>,
    normalizer: f64,
}

impl<'a, M: ResponseModel> BudgetObjective<'a, M> {
    /// Bind the objective and compute the baseline normalizer.
    ///
    /// `window = None` evaluates every period.
    ///
    /// # Errors
    /// - Channel-set mismatches between model, codec, and dataset.
    /// - [`ModelError::InvalidPeriodWindow`] for a bad window.
    /// - Any error from predicting the baseline dataset.
    pub fn new(
        model: &'a M, codec: &'a BudgetCodec, baseline: &ResponseDataset,
        window: Option<Range<usize>>,
    ) -> ModelResult<Self> {
        model.channels().ensure_same(codec.channels())?;
        model.channels().ensure_same(baseline.channels())?;
        let window = window.unwrap_or(0..baseline.periods());
        verify_window(&window, baseline.periods())?;

        let baseline_total = model.predict(baseline)?.window_total(&window)?;
        let normalizer = if baseline_total != 0.0 { baseline_total.abs() } else { 1.0 };
        Ok(Self { model, codec, window, normalizer })
    }

    pub fn window(&self) -> &Range<usize> {
        &self.window
    }

    /// Baseline dataset rescaled to the budget encoded by `deviation`.
    ///
    /// # Errors
    /// Length mismatches or non-finite multipliers.
    pub fn scaled_dataset(
        &self, deviation: &Point, baseline: &ResponseDataset,
    ) -> ModelResult<ResponseDataset> {
        let multipliers = self.codec.multipliers(deviation.view())?;
        baseline.scaled(multipliers.view())
    }

    /// Un-normalized prediction total over the window.
    pub fn window_total(&self, prediction: &Prediction) -> ModelResult<f64> {
        prediction.window_total(&self.window)
    }
}

impl<M: ResponseModel> Objective for BudgetObjective<'_, M> {
    type Data = ResponseDataset;

    fn value(&self, deviation: &Point, baseline: &ResponseDataset) -> OptResult<f64> {
        let scaled = self.scaled_dataset(deviation, baseline)?;
        let prediction = self.model.predict(&scaled)?;
        Ok(self.window_total(&prediction)? / self.normalizer)
    }

    fn check(&self, deviation: &Point, baseline: &ResponseDataset) -> OptResult<()> {
        self.model.channels().ensure_same(baseline.channels()).map_err(ModelError::from)?;
        self.model.channels().ensure_len(deviation.len()).map_err(ModelError::from)?;
        let value = self.value(deviation, baseline)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value });
        }
        Ok(())
    }

    fn grad(&self, deviation: &Point, baseline: &ResponseDataset) -> OptResult<Grad> {
        let scaled = self.scaled_dataset(deviation, baseline)?;
        let sensitivity = self.model.spend_sensitivity(&scaled)?;
        let weighted = &sensitivity.slice(s![self.window.clone(), ..])
            * &baseline.spend().slice(s![self.window.clone(), ..]);
        let grad: Array1<f64> = weighted.sum_axis(Axis(0)) / self.normalizer;
        Ok(grad)
    }
}
