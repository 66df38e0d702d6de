//! Reference revenue model, baseline budget, and seeded baseline dataset.
//!
//! Five channels (OLV, Social, Display, Search, Audio) with Hill curves of
//! increasing half-saturation and steepness, a trend weight of `0.5`, and an
//! output scale of `1000`. The baseline dataset has 156 weekly periods with
//! `trend = linspace(0, 3, 156)` and per-channel spend drawn as
//! `exp(Normal(-2, σ))` from a seeded RNG, so repeated builds with the same
//! seed are identical.
use ndarray::{Array1, Array2};
use rand::{SeedableRng, distributions::Distribution, rngs::StdRng};
use statrs::distribution::Normal;

use crate::{
    budget::{config::BudgetConfig, errors::ConfigResult},
    response::{
        dataset::{Covariates, ResponseDataset},
        errors::{ModelError, ModelResult},
        hill_trend::{ChannelCurve, HillTrendModel, TREND_COVARIATE},
        traits::ResponseModel,
    },
};

/// Seed used by [`reference_dataset`] unless another is requested.
pub const REFERENCE_SEED: u64 = 42;

/// Weekly periods in the reference dataset.
pub const REFERENCE_PERIODS: usize = 156;

/// `(channel, N, k, w, σ)` rows in canonical order.
const REFERENCE_CHANNELS: [(&str, f64, f64, f64, f64); 5] = [
    ("OLV", 1.2, 2.0, 0.20, 4.0),
    ("Social", 1.5, 3.0, 0.10, 2.4),
    ("Display", 1.8, 4.0, 0.05, 2.0),
    ("Search", 2.1, 5.0, 0.15, 2.2),
    ("Audio", 2.4, 6.0, 0.10, 1.8),
];

/// Baseline spend per channel, same order as the model.
pub const REFERENCE_BASELINE: [(&str, f64); 5] = [
    ("OLV", 25000.0),
    ("Social", 7000.0),
    ("Display", 3000.0),
    ("Search", 3500.0),
    ("Audio", 1000.0),
];

const TREND_WEIGHT: f64 = 0.5;
const OUTPUT_SCALE: f64 = 1000.0;
const LOG_SPEND_MEAN: f64 = -2.0;
const TREND_END: f64 = 3.0;

pub fn reference_model() -> ModelResult<HillTrendModel> {
    HillTrendModel::new(
        REFERENCE_CHANNELS.iter().map(|&(name, n, k, w, _)| (name, ChannelCurve::new(n, k, w))),
        TREND_WEIGHT,
        OUTPUT_SCALE,
    )
}

/// Baseline configuration with the default ±20% bounds.
pub fn reference_config() -> ConfigResult<BudgetConfig> {
    BudgetConfig::new(REFERENCE_BASELINE, None)
}

/// Baseline dataset drawn with `seed`.
///
/// Channels are drawn one full column at a time in canonical order, so the
/// draw sequence does not depend on storage layout.
pub fn reference_dataset(seed: u64) -> ModelResult<ResponseDataset> {
    let model = reference_model()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut spend = Array2::zeros((REFERENCE_PERIODS, REFERENCE_CHANNELS.len()));
    for (col, &(name, .., sigma)) in REFERENCE_CHANNELS.iter().enumerate() {
        let log_spend = Normal::new(LOG_SPEND_MEAN, sigma).map_err(|_| {
            ModelError::InvalidSpendDistribution { channel: name.to_string(), sigma }
        })?;
        for t in 0..REFERENCE_PERIODS {
            spend[[t, col]] = log_spend.sample(&mut rng).exp();
        }
    }
    let mut covariates = Covariates::new();
    covariates.insert(
        TREND_COVARIATE.to_string(),
        Array1::linspace(0.0, TREND_END, REFERENCE_PERIODS),
    );
    ResponseDataset::new(model.channels().clone(), spend, covariates)
}
