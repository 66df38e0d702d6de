//! Response-model interface and its outputs.
//!
//! - [`ResponseModel`]: trait any spend → outcome model implements.
//! - [`Prediction`]: per-period outcome series, reducible to a scalar total.
//! - [`ContributionSet`]: per-channel, per-period attributable outcome.
//!
//! Models are stateless with respect to a call: the same dataset always
//! produces the same prediction, and nothing is cached between calls.
use std::ops::Range;

use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::{
    budget::channels::{Channel, ChannelSet},
    response::{
        dataset::ResponseDataset,
        errors::{ModelError, ModelResult},
    },
};

/// Spend-response model.
///
/// Required:
/// - `channels`: the channel set the model was fitted on; datasets passed to
///   the other methods must use the same set.
/// - `predict`: per-period outcome for a dataset.
/// - `contributions`: per-channel attributable outcome for a dataset.
///
/// Optional:
/// - `spend_sensitivity`: `∂prediction_t / ∂spend_{t,c}` as a
///   `periods × channels` matrix. The default returns
///   [`ModelError::GradientNotImplemented`], which makes the optimizer fall
///   back to finite differences.
pub trait ResponseModel {
    fn channels(&self) -> &ChannelSet;
    fn predict(&self, data: &ResponseDataset) -> ModelResult<Prediction>;
    fn contributions(&self, data: &ResponseDataset) -> ModelResult<ContributionSet>;

    fn spend_sensitivity(&self, _data: &ResponseDataset) -> ModelResult<Array2<f64>> {
        Err(ModelError::GradientNotImplemented)
    }
}

/// Per-period predicted outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    series: Array1<f64>,
}

impl Prediction {
    /// Wrap a prediction series, rejecting NaN/±∞ entries.
    ///
    /// # Errors
    /// Returns [`ModelError::NonFiniteOutput`] for the first bad period.
    pub fn new(series: Array1<f64>) -> ModelResult<Self> {
        if let Some((period, &value)) = series.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ModelError::NonFiniteOutput { period, value });
        }
        Ok(Self { series })
    }

    pub fn series(&self) -> &Array1<f64> {
        &self.series
    }

    pub fn periods(&self) -> usize {
        self.series.len()
    }

    /// Sum over all periods; the scalar the optimizer maximizes.
    pub fn total(&self) -> f64 {
        self.series.sum()
    }

    /// Sum over the half-open period range `window`.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidPeriodWindow`] for an empty range or one
    /// extending past the series.
    pub fn window_total(&self, window: &Range<usize>) -> ModelResult<f64> {
        verify_window(window, self.periods())?;
        Ok(self.series.slice(ndarray::s![window.clone()]).sum())
    }
}

/// Check that `window` is a non-empty range inside `0..periods`.
pub fn verify_window(window: &Range<usize>, periods: usize) -> ModelResult<()> {
    if window.start >= window.end || window.end > periods {
        return Err(ModelError::InvalidPeriodWindow {
            start: window.start,
            end: window.end,
            periods,
        });
    }
    Ok(())
}

/// Per-channel, per-period contributions (`periods × channels`).
///
/// Contributions are attributions, not a partition: their sum need not equal
/// the prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionSet {
    channels: ChannelSet,
    values: Array2<f64>,
}

impl ContributionSet {
    /// # Errors
    /// Returns [`ModelError::ChannelCountMismatch`] if the column count does
    /// not match `channels`, or [`ModelError::NonFiniteOutput`] for a bad
    /// entry (reported by period).
    pub fn new(channels: ChannelSet, values: Array2<f64>) -> ModelResult<Self> {
        if values.ncols() != channels.len() {
            return Err(ModelError::ChannelCountMismatch {
                expected: channels.len(),
                actual: values.ncols(),
            });
        }
        if let Some(((period, _), &value)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ModelError::NonFiniteOutput { period, value });
        }
        Ok(Self { channels, values })
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Contribution series for a named channel.
    pub fn channel(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.channels.index_of(name).map(|i| self.values.column(i))
    }

    /// Per-channel totals over all periods, in canonical order.
    pub fn totals(&self) -> Array1<f64> {
        self.values.sum_axis(Axis(0))
    }

    /// Total contribution of a named channel.
    pub fn total_for(&self, name: &str) -> Option<f64> {
        self.channel(name).map(|c| c.sum())
    }

    /// `(channel, total)` pairs in canonical order.
    pub fn to_pairs(&self) -> Vec<(Channel, f64)> {
        self.channels.iter().map(str::to_string).zip(self.totals().iter().copied()).collect()
    }
}
