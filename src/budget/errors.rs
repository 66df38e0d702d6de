//! Errors for budget configuration (channel sets, spend vectors, bounds, and
//! the deviation codec).
//!
//! Every variant here is a *configuration* problem: it is detected eagerly,
//! before any solver runs, so a malformed request can never produce a silently
//! wrong optimum. Variants carry the offending channel (or index) and value so
//! a host can show an actionable message.
//!
//! ## Conventions
//! - Channel names are reported verbatim as configured.
//! - Indices are 0-based positions in the canonical channel order.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for configuration paths that may produce [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error for budgets, bounds, and constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    // ---- Channel set ----
    /// A channel set must contain at least one channel.
    EmptyChannelSet,

    /// Channel names must be unique.
    DuplicateChannel { channel: String },

    /// A configured channel was not supplied.
    MissingChannel { channel: String },

    /// A supplied channel is not part of the configuration.
    UnknownChannel { channel: String },

    /// Two inputs were built over different channel sets.
    ChannelSetMismatch { expected: Vec<String>, found: Vec<String> },

    // ---- Spend values ----
    /// Baseline spend must be finite and strictly positive.
    NonPositiveBaseline { channel: String, value: f64 },

    /// Spend must be finite and non-negative.
    InvalidSpend { channel: String, value: f64 },

    /// A deviation coordinate must be finite.
    NonFiniteDeviation { index: usize, value: f64 },

    /// A vector does not match the number of configured channels.
    LengthMismatch { expected: usize, actual: usize },

    // ---- Bounds ----
    /// Fractional bounds must be finite with -1 < lower <= upper.
    InvalidBound { channel: String, lower: f64, upper: f64, reason: &'static str },

    /// Default symmetric bound must be finite, >= 0 and < 1.
    InvalidDefaultBound { value: f64 },

    // ---- Constraint ----
    /// Equality constraint coefficients and target must be finite.
    InvalidConstraint { index: Option<usize>, value: f64 },
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Channel set ----
            ConfigError::EmptyChannelSet => {
                write!(f, "Channel set is empty.")
            }
            ConfigError::DuplicateChannel { channel } => {
                write!(f, "Channel '{channel}' appears more than once.")
            }
            ConfigError::MissingChannel { channel } => {
                write!(f, "Configured channel '{channel}' is missing from the input.")
            }
            ConfigError::UnknownChannel { channel } => {
                write!(f, "Channel '{channel}' is not part of the configuration.")
            }
            ConfigError::ChannelSetMismatch { expected, found } => {
                write!(f, "Channel set mismatch: expected {expected:?}, found {found:?}")
            }
            // ---- Spend values ----
            ConfigError::NonPositiveBaseline { channel, value } => {
                write!(
                    f,
                    "Baseline spend for channel '{channel}' must be finite and > 0; got: {value}"
                )
            }
            ConfigError::InvalidSpend { channel, value } => {
                write!(f, "Spend for channel '{channel}' must be finite and >= 0; got: {value}")
            }
            ConfigError::NonFiniteDeviation { index, value } => {
                write!(f, "Deviation at index {index} must be finite; got: {value}")
            }
            ConfigError::LengthMismatch { expected, actual } => {
                write!(f, "Length mismatch: expected {expected} channels, got {actual}")
            }
            // ---- Bounds ----
            ConfigError::InvalidBound { channel, lower, upper, reason } => {
                write!(f, "Invalid bound ({lower}, {upper}) for channel '{channel}': {reason}")
            }
            ConfigError::InvalidDefaultBound { value } => {
                write!(f, "Default bound must be finite with 0 <= bound < 1; got: {value}")
            }
            // ---- Constraint ----
            ConfigError::InvalidConstraint { index: Some(index), value } => {
                write!(f, "Constraint coefficient at index {index} must be finite; got: {value}")
            }
            ConfigError::InvalidConstraint { index: None, value } => {
                write!(f, "Constraint target must be finite; got: {value}")
            }
        }
    }
}

/// Convert a [`ConfigError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<ConfigError> for PyErr {
    fn from(err: ConfigError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
