//! Budget configuration and host-facing per-channel settings.
//!
//! [`BudgetConfig`] fixes the channel order and the baseline spend that every
//! deviation is measured against. [`ChannelSetting`] is the row a host form
//! produces per channel (starting spend plus fractional bounds); a slice of
//! them is assembled into a starting [`Budget`] and [`Bounds`] in canonical
//! order via [`assemble_settings`].
use crate::budget::{
    bounds::{Bounds, DEFAULT_SYMMETRIC_BOUND},
    channels::{Channel, ChannelSet},
    errors::ConfigResult,
    spend::Budget,
};

/// Ordered baseline budget plus the default symmetric bound offered to hosts.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetConfig {
    baseline: Budget,
    default_bound: f64,
    default_bounds: Bounds,
}

impl BudgetConfig {
    /// Build a configuration from ordered `(channel, baseline spend)` pairs.
    ///
    /// `default_bound` falls back to [`DEFAULT_SYMMETRIC_BOUND`].
    ///
    /// # Errors
    /// - Channel-set errors (empty, duplicates).
    /// - `ConfigError::InvalidSpend` / `ConfigError::NonPositiveBaseline`
    ///   for a baseline entry that is not finite and strictly positive.
    /// - `ConfigError::InvalidDefaultBound` unless `0 <= default_bound < 1`.
    pub fn new<I, S>(baseline: I, default_bound: Option<f64>) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<Channel>,
    {
        let baseline = Budget::from_ordered_pairs(baseline)?;
        Self::from_budget(baseline, default_bound)
    }

    /// Build a configuration over an already-constructed baseline budget.
    pub fn from_budget(baseline: Budget, default_bound: Option<f64>) -> ConfigResult<Self> {
        baseline.ensure_positive()?;
        let default_bound = default_bound.unwrap_or(DEFAULT_SYMMETRIC_BOUND);
        let default_bounds = Bounds::symmetric(baseline.channels(), default_bound)?;
        Ok(Self { baseline, default_bound, default_bounds })
    }

    pub fn baseline(&self) -> &Budget {
        &self.baseline
    }

    pub fn channels(&self) -> &ChannelSet {
        self.baseline.channels()
    }

    pub fn default_bound(&self) -> f64 {
        self.default_bound
    }

    /// `(-default_bound, default_bound)` for every channel.
    pub fn default_bounds(&self) -> &Bounds {
        &self.default_bounds
    }
}

/// One host-supplied row: starting spend and fractional bounds for a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSetting {
    pub channel: Channel,
    pub starting_budget: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl ChannelSetting {
    pub fn new(
        channel: impl Into<Channel>, starting_budget: f64, lower_bound: f64, upper_bound: f64,
    ) -> Self {
        Self { channel: channel.into(), starting_budget, lower_bound, upper_bound }
    }
}

/// Assemble host settings into a starting budget and bounds over `channels`.
///
/// Settings may arrive in any order; each configured channel must appear
/// exactly once.
///
/// # Errors
/// Unknown, duplicate, or missing channels; invalid spend; invalid bounds.
pub fn assemble_settings(
    channels: &ChannelSet, settings: &[ChannelSetting],
) -> ConfigResult<(Budget, Bounds)> {
    let start =
        Budget::from_pairs(channels, settings.iter().map(|s| (s.channel.as_str(), s.starting_budget)))?;
    let bounds = Bounds::from_pairs(
        channels,
        settings.iter().map(|s| (s.channel.as_str(), (s.lower_bound, s.upper_bound))),
    )?;
    Ok((start, bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::errors::ConfigError;
    use ndarray::array;

    fn config() -> BudgetConfig {
        BudgetConfig::new([("OLV", 25000.0), ("Social", 7000.0)], None).unwrap()
    }

    #[test]
    fn new_applies_default_bound() {
        let cfg = config();

        assert_eq!(cfg.default_bound(), DEFAULT_SYMMETRIC_BOUND);
        let bounds = cfg.default_bounds();
        assert_eq!(bounds.lower(), &array![-0.2, -0.2]);
        assert_eq!(bounds.upper(), &array![0.2, 0.2]);
    }

    #[test]
    fn new_rejects_zero_baseline_and_bad_default_bound() {
        assert_eq!(
            BudgetConfig::new([("A", 10.0), ("B", 0.0)], None).unwrap_err(),
            ConfigError::NonPositiveBaseline { channel: "B".to_string(), value: 0.0 }
        );
        assert_eq!(
            BudgetConfig::new([("A", 10.0)], Some(-0.1)).unwrap_err(),
            ConfigError::InvalidDefaultBound { value: -0.1 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Settings given out of order are placed in canonical channel order.
    fn assemble_settings_orders_by_channel_set() {
        let cfg = config();
        let settings = [
            ChannelSetting::new("Social", 8000.0, -0.1, 0.3),
            ChannelSetting::new("OLV", 24000.0, -0.2, 0.2),
        ];

        let (start, bounds) = assemble_settings(cfg.channels(), &settings).unwrap();

        assert_eq!(start.spend(), &array![24000.0, 8000.0]);
        assert_eq!(bounds.lower(), &array![-0.2, -0.1]);
        assert_eq!(bounds.upper(), &array![0.2, 0.3]);
    }

    #[test]
    fn assemble_settings_rejects_missing_channel() {
        let cfg = config();
        let settings = [ChannelSetting::new("OLV", 24000.0, -0.2, 0.2)];

        assert_eq!(
            assemble_settings(cfg.channels(), &settings).unwrap_err(),
            ConfigError::MissingChannel { channel: "Social".to_string() }
        );
    }
}
