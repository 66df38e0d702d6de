//! Budget ↔ deviation coordinate transform.
//!
//! Purpose
//! -------
//! Map named absolute-spend budgets to a fixed-size vector of fractional
//! deviations from a baseline, and back:
//!
//! ```text
//! encode: deviation[i] = (budget[i] − baseline[i]) / baseline[i]
//! decode: budget[i]    = (1 + deviation[i]) · baseline[i]
//! ```
//!
//! Deviation space is where the solver works: box bounds are plain fractions
//! and budget neutrality is the hyperplane `Σ baseline[i]·deviation[i] = 0`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The baseline is strictly positive in every channel (checked by
//!   [`BudgetCodec::new`] and by the free [`encode`]).
//! - The channel order used by both directions is the baseline's
//!   [`ChannelSet`]; budgets over a different set are rejected, never
//!   realigned by position.
//! - `decode(encode(b)) == b` up to floating rounding (relative error of a
//!   few ulps).
use ndarray::{Array1, ArrayView1, Zip};

use crate::budget::{
    channels::ChannelSet,
    errors::{ConfigError, ConfigResult},
    spend::Budget,
};

/// Encode `budget` as fractional deviations from `baseline`.
///
/// # Errors
/// - [`ConfigError::ChannelSetMismatch`] if the two budgets use different
///   channel sets.
/// - [`ConfigError::NonPositiveBaseline`] if any baseline entry is `<= 0`.
pub fn encode(budget: &Budget, baseline: &Budget) -> ConfigResult<Array1<f64>> {
    baseline.channels().ensure_same(budget.channels())?;
    baseline.ensure_positive()?;
    Ok(Zip::from(budget.spend()).and(baseline.spend()).map_collect(|&b, &base| (b - base) / base))
}

/// Decode fractional deviations back into an absolute budget over
/// `baseline`'s channels.
///
/// # Errors
/// - [`ConfigError::LengthMismatch`] if `deviation` has the wrong length.
/// - [`ConfigError::NonFiniteDeviation`] for a NaN/±∞ coordinate.
/// - [`ConfigError::InvalidSpend`] if a coordinate is below `-1`, which would
///   decode to negative spend.
pub fn decode(deviation: ArrayView1<'_, f64>, baseline: &Budget) -> ConfigResult<Budget> {
    baseline.channels().ensure_len(deviation.len())?;
    if let Some((index, &value)) = deviation.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ConfigError::NonFiniteDeviation { index, value });
    }
    let spend = Zip::from(deviation).and(baseline.spend()).map_collect(|&d, &base| (1.0 + d) * base);
    Budget::new(baseline.channels().clone(), spend)
}

/// Codec bound to one validated, strictly positive baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetCodec {
    baseline: Budget,
}

impl BudgetCodec {
    /// Bind a codec to `baseline`.
    ///
    /// # Errors
    /// Returns [`ConfigError::NonPositiveBaseline`] for the first channel with
    /// zero baseline spend.
    pub fn new(baseline: Budget) -> ConfigResult<Self> {
        baseline.ensure_positive()?;
        Ok(Self { baseline })
    }

    pub fn baseline(&self) -> &Budget {
        &self.baseline
    }

    pub fn channels(&self) -> &ChannelSet {
        self.baseline.channels()
    }

    /// See [`encode`].
    pub fn encode(&self, budget: &Budget) -> ConfigResult<Array1<f64>> {
        encode(budget, &self.baseline)
    }

    /// See [`decode`].
    pub fn decode(&self, deviation: ArrayView1<'_, f64>) -> ConfigResult<Budget> {
        decode(deviation, &self.baseline)
    }

    /// Per-channel spend multipliers `1 + deviation[i]` relative to baseline.
    ///
    /// These are the factors applied to each channel's baseline spend series
    /// when a candidate budget is turned into a model dataset.
    pub fn multipliers(&self, deviation: ArrayView1<'_, f64>) -> ConfigResult<Array1<f64>> {
        self.channels().ensure_len(deviation.len())?;
        Ok(deviation.mapv(|d| 1.0 + d))
    }
}
