//! Log-linear Hill response model with a trend covariate.
//!
//! Purpose
//! -------
//! Predict a per-period outcome from channel spend through per-channel Hill
//! saturation curves combined in log space with a trend term:
//!
//! ```text
//! η_t = ln(scale) + w₀·ln(trend_t + 1) + Σᵢ wᵢ·hill(x_{t,i}; Nᵢ, kᵢ)
//! ŷ_t = exp(η_t)
//! ```
//!
//! Key behaviors
//! -------------
//! - Contributions use marginal removal: channel `i` is credited with
//!   `ŷ_t − ŷ_t / exp(wᵢ·hillᵢ)`, i.e. the drop in prediction if its
//!   saturation term were zeroed.
//! - Provides an analytic spend sensitivity
//!   `∂ŷ_t/∂x_{t,i} = ŷ_t · wᵢ · hill'(x_{t,i})`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `Nᵢ > 0`, `kᵢ > 0`, `wᵢ >= 0`, `scale > 0`, all finite; `w₀` finite.
//!   With non-negative channel weights the prediction is non-decreasing in
//!   every channel's spend.
//! - The dataset must carry a `trend` covariate with `trend_t > -1`.
use ndarray::{Array1, Array2, Zip};

use crate::{
    budget::channels::{Channel, ChannelSet},
    response::{
        dataset::ResponseDataset,
        errors::{ModelError, ModelResult},
        saturation::{hill, hill_derivative},
        traits::{ContributionSet, Prediction, ResponseModel},
    },
};

/// Name of the covariate the model reads the trend from.
pub const TREND_COVARIATE: &str = "trend";

/// Hill curve parameters and log-space weight for one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelCurve {
    pub half_saturation: f64,
    pub shape: f64,
    pub weight: f64,
}

impl ChannelCurve {
    pub const fn new(half_saturation: f64, shape: f64, weight: f64) -> Self {
        Self { half_saturation, shape, weight }
    }

    /// Saturated response in `[0, 1]`.
    pub fn response(&self, spend: f64) -> f64 {
        hill(spend, self.half_saturation, self.shape)
    }

    /// Contribution to the log-linear predictor, `w · hill(x)`.
    pub fn log_effect(&self, spend: f64) -> f64 {
        self.weight * self.response(spend)
    }

    /// Derivative of [`ChannelCurve::log_effect`] with respect to spend.
    pub fn log_effect_slope(&self, spend: f64) -> f64 {
        self.weight * hill_derivative(spend, self.half_saturation, self.shape)
    }

    fn verify(&self, channel: &str) -> ModelResult<()> {
        let n = self.half_saturation;
        if !n.is_finite() || n <= 0.0 {
            return Err(ModelError::InvalidHalfSaturation { channel: channel.to_string(), value: n });
        }
        let k = self.shape;
        if !k.is_finite() || k <= 0.0 {
            return Err(ModelError::InvalidShape { channel: channel.to_string(), value: k });
        }
        let w = self.weight;
        if !w.is_finite() || w < 0.0 {
            return Err(ModelError::InvalidWeight { channel: channel.to_string(), value: w });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HillTrendModel {
    channels: ChannelSet,
    curves: Vec<ChannelCurve>,
    trend_weight: f64,
    scale: f64,
}

impl HillTrendModel {
    /// Build a model from ordered `(channel, curve)` pairs.
    ///
    /// The order of `curves` defines the model's channel set.
    ///
    /// # Errors
    /// - [`ModelError::Channels`] for an empty or duplicated channel list.
    /// - Parameter errors for any invalid curve, trend weight, or scale.
    pub fn new<I, S>(curves: I, trend_weight: f64, scale: f64) -> ModelResult<Self>
    where
        I: IntoIterator<Item = (S, ChannelCurve)>,
        S: Into<Channel>,
    {
        let (names, curves): (Vec<Channel>, Vec<ChannelCurve>) =
            curves.into_iter().map(|(n, c)| (n.into(), c)).unzip();
        let channels = ChannelSet::new(names)?;
        for (name, curve) in channels.iter().zip(curves.iter()) {
            curve.verify(name)?;
        }
        if !trend_weight.is_finite() {
            return Err(ModelError::InvalidTrendWeight { value: trend_weight });
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ModelError::InvalidScale { value: scale });
        }
        Ok(Self { channels, curves, trend_weight, scale })
    }

    pub fn curves(&self) -> &[ChannelCurve] {
        &self.curves
    }

    pub fn curve(&self, channel: &str) -> Option<&ChannelCurve> {
        self.channels.index_of(channel).map(|i| &self.curves[i])
    }

    pub fn trend_weight(&self) -> f64 {
        self.trend_weight
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Per-period, per-channel log effects `wᵢ·hillᵢ(x_{t,i})` and the
    /// resulting prediction series.
    fn evaluate(&self, data: &ResponseDataset) -> ModelResult<(Array2<f64>, Prediction)> {
        self.channels.ensure_same(data.channels())?;
        let trend = data.covariate(TREND_COVARIATE)?;
        if let Some((period, &value)) = trend.iter().enumerate().find(|(_, t)| **t <= -1.0) {
            return Err(ModelError::InvalidCovariate {
                name: TREND_COVARIATE.to_string(),
                period,
                value,
                reason: "Trend must be > -1 so that ln(trend + 1) is defined.",
            });
        }

        let spend = data.spend();
        let effects = Array2::from_shape_fn(spend.raw_dim(), |(t, i)| {
            self.curves[i].log_effect(spend[[t, i]])
        });
        let log_scale = self.scale.ln();
        let series: Array1<f64> = Zip::from(effects.rows()).and(trend).map_collect(|row, &t| {
            (log_scale + self.trend_weight * t.ln_1p() + row.sum()).exp()
        });
        Ok((effects, Prediction::new(series)?))
    }
}

impl ResponseModel for HillTrendModel {
    fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    fn predict(&self, data: &ResponseDataset) -> ModelResult<Prediction> {
        let (_, prediction) = self.evaluate(data)?;
        Ok(prediction)
    }

    fn contributions(&self, data: &ResponseDataset) -> ModelResult<ContributionSet> {
        let (mut values, prediction) = self.evaluate(data)?;
        Zip::from(values.rows_mut()).and(prediction.series()).for_each(|mut row, &y| {
            row.mapv_inplace(|e| -y * (-e).exp_m1());
        });
        ContributionSet::new(self.channels.clone(), values)
    }

    fn spend_sensitivity(&self, data: &ResponseDataset) -> ModelResult<Array2<f64>> {
        let (_, prediction) = self.evaluate(data)?;
        let (series, spend) = (prediction.series(), data.spend());
        Ok(Array2::from_shape_fn(spend.raw_dim(), |(t, i)| {
            series[t] * self.curves[i].log_effect_slope(spend[[t, i]])
        }))
    }
}
