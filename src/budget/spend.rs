//! Absolute-spend budgets keyed by channel.
//!
//! A [`Budget`] always carries exactly one non-negative, finite spend value
//! per configured channel, stored positionally in the canonical order of its
//! [`ChannelSet`]. Name-keyed input is accepted in any order and placed by
//! lookup, never by the order it arrived in.
use ndarray::Array1;

use crate::budget::{
    channels::{Channel, ChannelSet},
    errors::{ConfigError, ConfigResult},
};

/// Spend per channel in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    channels: ChannelSet,
    spend: Array1<f64>,
}

impl Budget {
    /// Build a budget from a positional spend vector.
    ///
    /// # Errors
    /// - [`ConfigError::LengthMismatch`] if `spend.len() != channels.len()`.
    /// - [`ConfigError::InvalidSpend`] for the first negative or non-finite entry.
    pub fn new(channels: ChannelSet, spend: Array1<f64>) -> ConfigResult<Self> {
        channels.ensure_len(spend.len())?;
        for (name, &value) in channels.iter().zip(spend.iter()) {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSpend { channel: name.to_string(), value });
            }
        }
        Ok(Self { channels, spend })
    }

    /// Build a budget over an existing channel set from `(name, spend)` pairs
    /// given in any order.
    ///
    /// # Errors
    /// - [`ConfigError::UnknownChannel`] for a name outside `channels`.
    /// - [`ConfigError::DuplicateChannel`] if a name is supplied twice.
    /// - [`ConfigError::MissingChannel`] for the first configured channel not
    ///   supplied.
    /// - Any error from [`Budget::new`].
    pub fn from_pairs<I, S>(channels: &ChannelSet, pairs: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut slots: Vec<Option<f64>> = vec![None; channels.len()];
        for (name, value) in pairs {
            let name = name.as_ref();
            let idx = channels
                .index_of(name)
                .ok_or_else(|| ConfigError::UnknownChannel { channel: name.to_string() })?;
            if slots[idx].replace(value).is_some() {
                return Err(ConfigError::DuplicateChannel { channel: name.to_string() });
            }
        }
        let spend = slots
            .into_iter()
            .zip(channels.iter())
            .map(|(slot, name)| {
                slot.ok_or_else(|| ConfigError::MissingChannel { channel: name.to_string() })
            })
            .collect::<ConfigResult<Vec<f64>>>()?;
        Budget::new(channels.clone(), Array1::from(spend))
    }

    /// Build a budget whose channel set is defined by the order of `pairs`.
    ///
    /// This is how a baseline configuration fixes the canonical order.
    pub fn from_ordered_pairs<I, S>(pairs: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<Channel>,
    {
        let (names, values): (Vec<Channel>, Vec<f64>) =
            pairs.into_iter().map(|(n, v)| (n.into(), v)).unzip();
        let channels = ChannelSet::new(names)?;
        Budget::new(channels, Array1::from(values))
    }

    /// Require every entry to be strictly positive (baseline invariant).
    ///
    /// # Errors
    /// Returns [`ConfigError::NonPositiveBaseline`] for the first zero entry.
    pub fn ensure_positive(&self) -> ConfigResult<()> {
        for (name, &value) in self.channels.iter().zip(self.spend.iter()) {
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveBaseline { channel: name.to_string(), value });
            }
        }
        Ok(())
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    /// Spend vector in canonical order.
    pub fn spend(&self) -> &Array1<f64> {
        &self.spend
    }

    /// Spend for a named channel.
    pub fn get(&self, channel: &str) -> Option<f64> {
        self.channels.index_of(channel).map(|i| self.spend[i])
    }

    /// Total spend across channels.
    pub fn total(&self) -> f64 {
        self.spend.sum()
    }

    /// Fraction of `reference_total` allocated to each channel.
    ///
    /// Passing the baseline total lets two budgets be compared on the same
    /// scale. Returns zeros when `reference_total` is not positive.
    pub fn shares(&self, reference_total: f64) -> Array1<f64> {
        if reference_total > 0.0 {
            &self.spend / reference_total
        } else {
            Array1::zeros(self.spend.len())
        }
    }

    /// `(channel, spend)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.channels.iter().zip(self.spend.iter().copied())
    }

    /// Owned `(channel, spend)` pairs in canonical order.
    pub fn to_pairs(&self) -> Vec<(Channel, f64)> {
        self.iter().map(|(n, v)| (n.to_string(), v)).collect()
    }
}
