//! Per-channel fractional deviation bounds.
//!
//! Purpose
//! -------
//! Represent the box `lower[i] <= deviation[i] <= upper[i]` in deviation space,
//! where a deviation of `-0.2` means "20% below baseline".
//!
//! Invariants & assumptions
//! ------------------------
//! - `-1 < lower[i] <= upper[i]`, both finite, so decoded spend stays strictly
//!   positive for a positive baseline.
//! - Vectors are positional in the canonical order of the owning
//!   [`ChannelSet`].
use ndarray::Array1;

use crate::budget::{
    channels::ChannelSet,
    errors::{ConfigError, ConfigResult},
};

/// Fractional bounds used when a configuration does not provide its own.
pub const DEFAULT_SYMMETRIC_BOUND: f64 = 0.2;

/// Validated per-channel `(lower, upper)` deviation limits.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    channels: ChannelSet,
    lower: Array1<f64>,
    upper: Array1<f64>,
}

impl Bounds {
    /// Build bounds from positional lower/upper vectors.
    ///
    /// # Errors
    /// - [`ConfigError::LengthMismatch`] if either vector has the wrong length.
    /// - [`ConfigError::InvalidBound`] if a pair is non-finite, has
    ///   `lower <= -1`, or has `lower > upper`.
    pub fn new(channels: ChannelSet, lower: Array1<f64>, upper: Array1<f64>) -> ConfigResult<Self> {
        channels.ensure_len(lower.len())?;
        channels.ensure_len(upper.len())?;
        for ((name, &lo), &hi) in channels.iter().zip(lower.iter()).zip(upper.iter()) {
            verify_bound(name, lo, hi)?;
        }
        Ok(Self { channels, lower, upper })
    }

    /// Build bounds over `channels` from `(name, (lower, upper))` pairs in any
    /// order.
    ///
    /// # Errors
    /// Unknown, duplicate, or missing channels, plus any [`Bounds::new`] error.
    pub fn from_pairs<I, S>(channels: &ChannelSet, pairs: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (S, (f64, f64))>,
        S: AsRef<str>,
    {
        let mut slots: Vec<Option<(f64, f64)>> = vec![None; channels.len()];
        for (name, pair) in pairs {
            let name = name.as_ref();
            let idx = channels
                .index_of(name)
                .ok_or_else(|| ConfigError::UnknownChannel { channel: name.to_string() })?;
            if slots[idx].replace(pair).is_some() {
                return Err(ConfigError::DuplicateChannel { channel: name.to_string() });
            }
        }
        let mut lower = Array1::zeros(channels.len());
        let mut upper = Array1::zeros(channels.len());
        for (i, (slot, name)) in slots.into_iter().zip(channels.iter()).enumerate() {
            let (lo, hi) =
                slot.ok_or_else(|| ConfigError::MissingChannel { channel: name.to_string() })?;
            lower[i] = lo;
            upper[i] = hi;
        }
        Bounds::new(channels.clone(), lower, upper)
    }

    /// Same `(-bound, bound)` pair for every channel.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidDefaultBound`] unless `0 <= bound < 1`.
    pub fn symmetric(channels: &ChannelSet, bound: f64) -> ConfigResult<Self> {
        if !bound.is_finite() || !(0.0..1.0).contains(&bound) {
            return Err(ConfigError::InvalidDefaultBound { value: bound });
        }
        let n = channels.len();
        Bounds::new(channels.clone(), Array1::from_elem(n, -bound), Array1::from_elem(n, bound))
    }

    /// Zero-width bounds pinning every channel at baseline.
    pub fn fixed(channels: &ChannelSet) -> Self {
        let n = channels.len();
        Self { channels: channels.clone(), lower: Array1::zeros(n), upper: Array1::zeros(n) }
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    pub fn lower(&self) -> &Array1<f64> {
        &self.lower
    }

    pub fn upper(&self) -> &Array1<f64> {
        &self.upper
    }

    /// `(lower, upper)` for a named channel.
    pub fn get(&self, channel: &str) -> Option<(f64, f64)> {
        self.channels.index_of(channel).map(|i| (self.lower[i], self.upper[i]))
    }

    /// Whether the zero-deviation point (baseline) lies inside the box.
    pub fn admits_baseline(&self) -> bool {
        self.lower.iter().zip(self.upper.iter()).all(|(&lo, &hi)| lo <= 0.0 && hi >= 0.0)
    }
}

fn verify_bound(channel: &str, lower: f64, upper: f64) -> ConfigResult<()> {
    let invalid = |reason: &'static str| ConfigError::InvalidBound {
        channel: channel.to_string(),
        lower,
        upper,
        reason,
    };
    if !lower.is_finite() || !upper.is_finite() {
        return Err(invalid("bounds must be finite"));
    }
    if lower <= -1.0 {
        return Err(invalid("lower bound must be > -1 (spend cannot reach zero)"));
    }
    if lower > upper {
        return Err(invalid("lower bound must not exceed upper bound"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn channels() -> ChannelSet {
        ChannelSet::new(["A", "B"]).unwrap()
    }

    #[test]
    fn from_pairs_orders_by_channel_set() {
        let bounds =
            Bounds::from_pairs(&channels(), [("B", (-0.1, 0.3)), ("A", (-0.2, 0.2))]).unwrap();

        assert_eq!(bounds.lower(), &array![-0.2, -0.1]);
        assert_eq!(bounds.upper(), &array![0.2, 0.3]);
        assert_eq!(bounds.get("B"), Some((-0.1, 0.3)));
    }

    #[test]
    // Purpose
    // -------
    // Reject lower <= -1 with the offending channel and pair.
    fn new_rejects_lower_at_minus_one() {
        let err = Bounds::new(channels(), array![-0.2, -1.0], array![0.2, 0.5]).unwrap_err();

        match err {
            ConfigError::InvalidBound { channel, lower, upper, .. } => {
                assert_eq!(channel, "B");
                assert_eq!(lower, -1.0);
                assert_eq!(upper, 0.5);
            }
            other => panic!("Expected InvalidBound, got {other:?}"),
        }
    }

    #[test]
    fn new_rejects_inverted_and_non_finite_pairs() {
        assert!(matches!(
            Bounds::new(channels(), array![0.3, 0.0], array![0.1, 0.0]),
            Err(ConfigError::InvalidBound { .. })
        ));
        assert!(matches!(
            Bounds::new(channels(), array![0.0, f64::NAN], array![0.0, 0.0]),
            Err(ConfigError::InvalidBound { .. })
        ));
    }

    #[test]
    fn symmetric_validates_range_and_admits_baseline() {
        let bounds = Bounds::symmetric(&channels(), 0.2).unwrap();

        assert!(bounds.admits_baseline());
        assert_eq!(
            Bounds::symmetric(&channels(), 1.0).unwrap_err(),
            ConfigError::InvalidDefaultBound { value: 1.0 }
        );
        assert!(Bounds::fixed(&channels()).admits_baseline());
    }
}
