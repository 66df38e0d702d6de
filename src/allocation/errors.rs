//! Errors returned by the budget [`Optimizer`](super::Optimizer).
//!
//! Keeps the two host-visible failure classes apart:
//! - [`AllocationError::Configuration`]: malformed request, detected before
//!   any solve.
//! - [`AllocationError::Optimization`]: the solver could not produce a
//!   converged, feasible optimum (including infeasible constraint sets).
//!
//! Model failures outside a solve (e.g. evaluating the final budget) are
//! reported as [`AllocationError::Model`].
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

use crate::{
    budget::errors::ConfigError, optimization::errors::OptError, response::errors::ModelError,
};

/// Result alias for optimizer operations.
pub type AllocationResult<T> = Result<T, AllocationError>;

#[derive(Debug, Clone, PartialEq)]
pub enum AllocationError {
    /// Invalid configuration or request (ConfigurationError).
    Configuration(ConfigError),

    /// Response model rejected its inputs.
    Model(ModelError),

    /// Solver failure, infeasibility, or non-convergence (OptimizationError).
    Optimization(OptError),
}

impl AllocationError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, AllocationError::Configuration(_))
    }

    pub fn is_optimization(&self) -> bool {
        matches!(self, AllocationError::Optimization(_))
    }
}

impl std::error::Error for AllocationError {}

impl std::fmt::Display for AllocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationError::Configuration(err) => write!(f, "Configuration error: {err}"),
            AllocationError::Model(err) => write!(f, "Model error: {err}"),
            AllocationError::Optimization(err) => write!(f, "Optimization error: {err}"),
        }
    }
}

impl From<ConfigError> for AllocationError {
    fn from(err: ConfigError) -> Self {
        AllocationError::Configuration(err)
    }
}

impl From<ModelError> for AllocationError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Channels(config) => AllocationError::Configuration(config),
            ModelError::ChannelSetMismatch { expected, found } => {
                AllocationError::Configuration(ConfigError::ChannelSetMismatch { expected, found })
            }
            other => AllocationError::Model(other),
        }
    }
}

impl From<OptError> for AllocationError {
    fn from(err: OptError) -> Self {
        AllocationError::Optimization(err)
    }
}

/// Convert an [`AllocationError`] into a Python `ValueError` with the error
/// message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<AllocationError> for PyErr {
    fn from(err: AllocationError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_errors_surface_as_configuration() {
        let mismatch = ModelError::ChannelSetMismatch {
            expected: vec!["A".to_string()],
            found: vec!["B".to_string()],
        };

        assert!(AllocationError::from(mismatch).is_configuration());
        assert!(AllocationError::from(ConfigError::EmptyChannelSet).is_configuration());
        assert!(AllocationError::from(OptError::MissingSolution).is_optimization());
        assert_eq!(
            AllocationError::from(ModelError::EmptyDataset),
            AllocationError::Model(ModelError::EmptyDataset)
        );
    }
}
