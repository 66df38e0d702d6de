//! Time-indexed spend dataset fed to response models.
//!
//! Purpose
//! -------
//! Hold a `periods × channels` spend matrix whose columns follow the
//! canonical [`ChannelSet`] order, plus named exogenous covariate series
//! (e.g. `trend`) of the same length.
//!
//! Key behaviors
//! -------------
//! - [`ResponseDataset::new`] validates shape and finiteness once.
//! - [`ResponseDataset::scaled`] derives a candidate dataset by multiplying
//!   each channel column by a per-channel factor; covariates are shared, not
//!   copied.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one period; every spend entry and covariate value is finite.
//! - Spend may be negative after arbitrary scaling; models are responsible
//!   for clamping it into their own domain.
use std::{collections::BTreeMap, sync::Arc};

use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::{
    budget::channels::ChannelSet,
    response::errors::{ModelError, ModelResult},
};

/// Named covariate series keyed by name (iteration order is sorted by name).
pub type Covariates = BTreeMap<String, Array1<f64>>;

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDataset {
    channels: ChannelSet,
    spend: Array2<f64>,
    covariates: Arc<Covariates>,
}

impl ResponseDataset {
    /// Build a validated dataset.
    ///
    /// # Errors
    /// - [`ModelError::EmptyDataset`] for zero periods.
    /// - [`ModelError::ChannelCountMismatch`] if `spend.ncols() != channels.len()`.
    /// - [`ModelError::InvalidSpendValue`] for a non-finite spend entry.
    /// - [`ModelError::CovariateLengthMismatch`] / [`ModelError::InvalidCovariate`]
    ///   for a covariate with the wrong length or a non-finite value.
    pub fn new(
        channels: ChannelSet, spend: Array2<f64>, covariates: Covariates,
    ) -> ModelResult<Self> {
        let periods = spend.nrows();
        if periods == 0 {
            return Err(ModelError::EmptyDataset);
        }
        if spend.ncols() != channels.len() {
            return Err(ModelError::ChannelCountMismatch {
                expected: channels.len(),
                actual: spend.ncols(),
            });
        }
        for ((period, col), &value) in spend.indexed_iter() {
            if !value.is_finite() {
                return Err(ModelError::InvalidSpendValue {
                    channel: channels.name(col).unwrap_or_default().to_string(),
                    period,
                    value,
                });
            }
        }
        for (name, series) in &covariates {
            verify_covariate(name, series.view(), periods)?;
        }
        Ok(Self { channels, spend, covariates: Arc::new(covariates) })
    }

    /// Return a copy with `name` added or replaced.
    pub fn with_covariate(&self, name: impl Into<String>, series: Array1<f64>) -> ModelResult<Self> {
        let name = name.into();
        verify_covariate(&name, series.view(), self.periods())?;
        let mut covariates = (*self.covariates).clone();
        covariates.insert(name, series);
        Ok(Self {
            channels: self.channels.clone(),
            spend: self.spend.clone(),
            covariates: Arc::new(covariates),
        })
    }

    /// Multiply each channel column by its factor in `multipliers`.
    ///
    /// # Errors
    /// - [`ModelError::ChannelCountMismatch`] on a length mismatch.
    /// - [`ModelError::InvalidMultiplier`] for a non-finite factor.
    pub fn scaled(&self, multipliers: ArrayView1<'_, f64>) -> ModelResult<Self> {
        if multipliers.len() != self.channels.len() {
            return Err(ModelError::ChannelCountMismatch {
                expected: self.channels.len(),
                actual: multipliers.len(),
            });
        }
        if let Some((index, &value)) = multipliers.iter().enumerate().find(|(_, m)| !m.is_finite())
        {
            return Err(ModelError::InvalidMultiplier { index, value });
        }
        let spend = &self.spend * &multipliers.insert_axis(Axis(0));
        Ok(Self { channels: self.channels.clone(), spend, covariates: Arc::clone(&self.covariates) })
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    /// Number of periods (rows).
    pub fn periods(&self) -> usize {
        self.spend.nrows()
    }

    /// Spend matrix, `periods × channels`.
    pub fn spend(&self) -> &Array2<f64> {
        &self.spend
    }

    /// Spend series for a named channel.
    pub fn channel(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.channels.index_of(name).map(|i| self.spend.column(i))
    }

    /// Named covariate series.
    ///
    /// # Errors
    /// Returns [`ModelError::MissingCovariate`] if `name` is absent.
    pub fn covariate(&self, name: &str) -> ModelResult<&Array1<f64>> {
        self.covariates
            .get(name)
            .ok_or_else(|| ModelError::MissingCovariate { name: name.to_string() })
    }

    pub fn covariates(&self) -> &Covariates {
        &self.covariates
    }

    /// Per-channel totals over all periods.
    pub fn channel_totals(&self) -> Array1<f64> {
        self.spend.sum_axis(Axis(0))
    }
}

fn verify_covariate(name: &str, series: ArrayView1<'_, f64>, periods: usize) -> ModelResult<()> {
    if series.len() != periods {
        return Err(ModelError::CovariateLengthMismatch {
            name: name.to_string(),
            expected: periods,
            actual: series.len(),
        });
    }
    if let Some((period, &value)) = series.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ModelError::InvalidCovariate {
            name: name.to_string(),
            period,
            value,
            reason: "Covariate values must be finite.",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn dataset() -> ResponseDataset {
        let channels = ChannelSet::new(["A", "B"]).unwrap();
        let mut covariates = Covariates::new();
        covariates.insert("trend".to_string(), array![0.0, 1.0, 2.0]);
        ResponseDataset::new(channels, array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]], covariates)
            .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Scaling multiplies whole columns and leaves covariates untouched.
    fn scaled_multiplies_columns() {
        let data = dataset();

        let scaled = data.scaled(array![2.0, 0.5].view()).unwrap();

        assert_eq!(scaled.spend(), &array![[2.0, 1.0], [6.0, 2.0], [10.0, 3.0]]);
        assert_eq!(scaled.covariate("trend").unwrap(), data.covariate("trend").unwrap());
        assert_eq!(data.spend()[[0, 0]], 1.0);
    }

    #[test]
    fn scaled_rejects_bad_multipliers() {
        let data = dataset();

        assert_eq!(
            data.scaled(array![1.0].view()).unwrap_err(),
            ModelError::ChannelCountMismatch { expected: 2, actual: 1 }
        );
        assert!(matches!(
            data.scaled(array![1.0, f64::INFINITY].view()),
            Err(ModelError::InvalidMultiplier { index: 1, .. })
        ));
    }

    #[test]
    fn new_validates_shape_and_covariates() {
        let channels = ChannelSet::new(["A", "B"]).unwrap();

        assert_eq!(
            ResponseDataset::new(channels.clone(), Array2::zeros((0, 2)), Covariates::new())
                .unwrap_err(),
            ModelError::EmptyDataset
        );
        assert_eq!(
            ResponseDataset::new(channels.clone(), Array2::zeros((3, 1)), Covariates::new())
                .unwrap_err(),
            ModelError::ChannelCountMismatch { expected: 2, actual: 1 }
        );

        let data = dataset();
        assert!(matches!(
            data.with_covariate("trend", array![0.0, 1.0]),
            Err(ModelError::CovariateLengthMismatch { .. })
        ));
        assert_eq!(
            data.covariate("season").unwrap_err(),
            ModelError::MissingCovariate { name: "season".to_string() }
        );
    }

    #[test]
    fn channel_lookup_and_totals() {
        let data = dataset();

        assert_eq!(data.channel("B").unwrap(), array![2.0, 4.0, 6.0].view());
        assert_eq!(data.channel_totals(), array![9.0, 12.0]);
        assert_eq!(data.periods(), 3);
    }
}
