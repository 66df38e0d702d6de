//! Errors for response models and their datasets.
//!
//! Covers invalid curve parameters, malformed datasets, missing covariates,
//! non-finite model output, and the "no analytic sensitivity" signal used to
//! select finite differences.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

use crate::budget::errors::ConfigError;

/// Result alias for response-model operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Parameters ----
    /// Half-saturation point `N` must be finite and > 0.
    InvalidHalfSaturation { channel: String, value: f64 },

    /// Hill shape `k` must be finite and > 0.
    InvalidShape { channel: String, value: f64 },

    /// Channel weight must be finite and >= 0.
    InvalidWeight { channel: String, value: f64 },

    /// Trend weight must be finite.
    InvalidTrendWeight { value: f64 },

    /// Output scale must be finite and > 0.
    InvalidScale { value: f64 },

    // ---- Dataset ----
    /// Dataset must contain at least one period.
    EmptyDataset,

    /// Spend matrix column count must equal the number of channels.
    ChannelCountMismatch { expected: usize, actual: usize },

    /// Dataset and model were built over different channel sets.
    ChannelSetMismatch { expected: Vec<String>, found: Vec<String> },

    /// Channel configuration rejected while building a model or dataset.
    Channels(ConfigError),

    /// Spend entries must be finite.
    InvalidSpendValue { channel: String, period: usize, value: f64 },

    /// A covariate the model needs is not present.
    MissingCovariate { name: String },

    /// Covariate series must have one value per period.
    CovariateLengthMismatch { name: String, expected: usize, actual: usize },

    /// Covariate value outside the model's domain.
    InvalidCovariate { name: String, period: usize, value: f64, reason: &'static str },

    /// Per-channel spend multipliers must match the channel count and be finite.
    InvalidMultiplier { index: usize, value: f64 },

    /// Spend generator parameters rejected by the sampling distribution.
    InvalidSpendDistribution { channel: String, sigma: f64 },

    /// Period window must be non-empty and inside the dataset.
    InvalidPeriodWindow { start: usize, end: usize, periods: usize },

    // ---- Output ----
    /// Model produced a NaN/±∞ prediction.
    NonFiniteOutput { period: usize, value: f64 },

    /// Model has no analytic spend sensitivity; callers should fall back to
    /// finite differences.
    GradientNotImplemented,
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Parameters ----
            ModelError::InvalidHalfSaturation { channel, value } => {
                write!(
                    f,
                    "Half-saturation for channel '{channel}' must be finite and > 0; got: {value}"
                )
            }
            ModelError::InvalidShape { channel, value } => {
                write!(f, "Shape for channel '{channel}' must be finite and > 0; got: {value}")
            }
            ModelError::InvalidWeight { channel, value } => {
                write!(f, "Weight for channel '{channel}' must be finite and >= 0; got: {value}")
            }
            ModelError::InvalidTrendWeight { value } => {
                write!(f, "Trend weight must be finite; got: {value}")
            }
            ModelError::InvalidScale { value } => {
                write!(f, "Output scale must be finite and > 0; got: {value}")
            }

            // ---- Dataset ----
            ModelError::EmptyDataset => {
                write!(f, "Dataset has no periods.")
            }
            ModelError::ChannelCountMismatch { expected, actual } => {
                write!(f, "Spend matrix has {actual} channel columns; expected {expected}")
            }
            ModelError::ChannelSetMismatch { expected, found } => {
                write!(f, "Dataset channels {found:?} do not match model channels {expected:?}")
            }
            ModelError::Channels(err) => {
                write!(f, "Invalid channel configuration: {err}")
            }
            ModelError::InvalidSpendValue { channel, period, value } => {
                write!(
                    f,
                    "Spend for channel '{channel}' at period {period} must be finite; got: {value}"
                )
            }
            ModelError::MissingCovariate { name } => {
                write!(f, "Missing covariate '{name}'")
            }
            ModelError::CovariateLengthMismatch { name, expected, actual } => {
                write!(f, "Covariate '{name}' has {actual} values; expected {expected}")
            }
            ModelError::InvalidCovariate { name, period, value, reason } => {
                write!(f, "Invalid covariate '{name}' at period {period}: {value}: {reason}")
            }
            ModelError::InvalidMultiplier { index, value } => {
                write!(f, "Invalid spend multiplier at index {index}: {value}, must be finite")
            }
            ModelError::InvalidSpendDistribution { channel, sigma } => {
                write!(f, "Invalid log-spend deviation {sigma} for channel '{channel}'")
            }
            ModelError::InvalidPeriodWindow { start, end, periods } => {
                write!(
                    f,
                    "Invalid period window {start}..{end} for a dataset with {periods} periods"
                )
            }

            // ---- Output ----
            ModelError::NonFiniteOutput { period, value } => {
                write!(f, "Non-finite prediction at period {period}: {value}")
            }
            ModelError::GradientNotImplemented => {
                write!(f, "Spend sensitivity not implemented for this model")
            }
        }
    }
}

impl From<ConfigError> for ModelError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ChannelSetMismatch { expected, found } => {
                ModelError::ChannelSetMismatch { expected, found }
            }
            ConfigError::LengthMismatch { expected, actual } => {
                ModelError::ChannelCountMismatch { expected, actual }
            }
            other => ModelError::Channels(other),
        }
    }
}

/// Convert a [`ModelError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
