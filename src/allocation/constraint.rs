//! Linear equality on the deviation vector.
//!
//! The default policy is budget neutrality, `Σᵢ baselineᵢ · devᵢ = 0`: the
//! total spend after reallocation equals the baseline total. A non-zero target
//! asks for a fixed absolute net change in total spend instead.
use ndarray::Array1;

use crate::{
    budget::{
        channels::ChannelSet,
        errors::{ConfigError, ConfigResult},
        spend::Budget,
    },
    optimization::{errors::OptResult, projected_gradient::LinearEquality},
};

/// `coeffs · deviation = target`, indexed by a channel set.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    channels: ChannelSet,
    coeffs: Array1<f64>,
    target: f64,
}

impl LinearConstraint {
    /// # Errors
    /// - [`ConfigError::LengthMismatch`] if `coeffs` does not match `channels`.
    /// - [`ConfigError::InvalidConstraint`] for a non-finite coefficient or
    ///   target.
    pub fn new(channels: ChannelSet, coeffs: Array1<f64>, target: f64) -> ConfigResult<Self> {
        channels.ensure_len(coeffs.len())?;
        if let Some((index, &value)) = coeffs.iter().enumerate().find(|(_, c)| !c.is_finite()) {
            return Err(ConfigError::InvalidConstraint { index: Some(index), value });
        }
        if !target.is_finite() {
            return Err(ConfigError::InvalidConstraint { index: None, value: target });
        }
        Ok(Self { channels, coeffs, target })
    }

    /// Keep total spend equal to the baseline total.
    pub fn budget_neutral(baseline: &Budget) -> Self {
        Self { channels: baseline.channels().clone(), coeffs: baseline.spend().clone(), target: 0.0 }
    }

    /// Change total spend by exactly `target` (absolute units).
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidConstraint`] for a non-finite target.
    pub fn net_change(baseline: &Budget, target: f64) -> ConfigResult<Self> {
        Self::new(baseline.channels().clone(), baseline.spend().clone(), target)
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    pub fn coeffs(&self) -> &Array1<f64> {
        &self.coeffs
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// `coeffs · deviation − target`.
    pub fn residual(&self, deviation: &Array1<f64>) -> f64 {
        self.coeffs.dot(deviation) - self.target
    }

    pub(crate) fn to_equality(&self) -> OptResult<LinearEquality> {
        LinearEquality::new(self.coeffs.clone(), self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn baseline() -> Budget {
        Budget::from_ordered_pairs([("A", 100.0), ("B", 300.0)]).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Budget neutrality weights each deviation by its baseline spend, so the
    // residual is the net change in total spend.
    fn budget_neutral_residual_is_net_spend_change() {
        let constraint = LinearConstraint::budget_neutral(&baseline());

        assert_eq!(constraint.target(), 0.0);
        assert_eq!(constraint.residual(&array![0.3, -0.1]), 0.0);
        assert_eq!(constraint.residual(&array![0.1, 0.0]), 10.0);
    }

    #[test]
    fn net_change_and_new_validate_inputs() {
        let base = baseline();

        assert_eq!(LinearConstraint::net_change(&base, 50.0).unwrap().target(), 50.0);
        assert_eq!(
            LinearConstraint::net_change(&base, f64::INFINITY).unwrap_err(),
            ConfigError::InvalidConstraint { index: None, value: f64::INFINITY }
        );
        assert_eq!(
            LinearConstraint::new(base.channels().clone(), array![1.0], 0.0).unwrap_err(),
            ConfigError::LengthMismatch { expected: 2, actual: 1 }
        );
        assert!(matches!(
            LinearConstraint::new(base.channels().clone(), array![1.0, f64::NAN], 0.0),
            Err(ConfigError::InvalidConstraint { index: Some(1), .. })
        ));
    }
}
