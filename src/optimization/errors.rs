//! Errors raised by the projected-gradient optimizer and its option types.
//!
//! Crate errors that cross argmin's `Error` boundary are recovered intact by
//! the `From<argmin::core::Error>` impl; argmin's own failures become
//! [`OptError::Backend`].
use argmin::core::{ArgminError, Error};

use crate::response::errors::ModelError;

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Objective has no analytic gradient; callers fall back to finite differences.
    GradientNotImplemented,

    /// Gradient length differs from the deviation vector's.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Non-finite gradient component.
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- SolverOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Non-monotone line-search memory needs to be at least 1.
    InvalidMemory {
        mem: usize,
        reason: &'static str,
    },

    /// Wall-clock limit needs to be non-zero.
    InvalidTimeout {
        secs: f64,
        reason: &'static str,
    },

    // ---- Feasible region ----
    /// Bounds, coefficients and starting point must share one dimension.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Box bounds must be finite with lower <= upper.
    InvalidBoxBound {
        index: usize,
        lower: f64,
        upper: f64,
    },

    /// Equality coefficients (index `Some`) or target (index `None`) must be finite.
    InvalidEquality {
        index: Option<usize>,
        value: f64,
    },

    /// No point in the box satisfies the equality constraint.
    Infeasible {
        target: f64,
        min_reachable: f64,
        max_reachable: f64,
    },

    /// Starting point must be finite.
    InvalidStartPoint {
        index: usize,
        value: f64,
    },

    // ---- Objective ----
    /// Objective evaluated to NaN or ±inf.
    NonFiniteCost {
        value: f64,
    },

    /// Objective rejected the point because the underlying model failed.
    Model(ModelError),

    // ---- Optimizer outcome ----
    /// Solution coordinates must be finite.
    InvalidSolution {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Solver returned no solution vector.
    MissingSolution,

    /// Solver stopped without meeting a convergence criterion.
    NotConverged {
        status: String,
        iterations: u64,
    },

    /// Wall-clock limit reached before convergence.
    Timeout {
        iterations: u64,
    },

    /// Solver state was missing a value the spectral projected gradient
    /// solver needs (parameter or gradient).
    MissingState {
        what: &'static str,
    },

    // ---- Backend ----
    /// Error raised inside argmin itself; `kind` names the `ArgminError`
    /// variant, or `"other"` for foreign errors.
    Backend {
        kind: &'static str,
        text: String,
    },
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Objective provides no analytic gradient")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient has {found} components, expected {expected}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Gradient component {index} is {value}: {reason}")
            }

            // ---- SolverOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid relative objective-change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "At least one of tol_grad, tol_cost, max_iter is required")
            }
            OptError::InvalidMemory { mem, reason } => {
                write!(f, "Invalid line-search memory {mem}: {reason}")
            }
            OptError::InvalidTimeout { secs, reason } => {
                write!(f, "Invalid timeout {secs}s: {reason}")
            }

            // ---- Feasible region ----
            OptError::DimensionMismatch { what, expected, found } => {
                write!(f, "Dimension mismatch for {what}: expected {expected}, found {found}")
            }
            OptError::InvalidBoxBound { index, lower, upper } => {
                write!(
                    f,
                    "Invalid box bound at index {index}: ({lower}, {upper}), must be finite with lower <= upper"
                )
            }
            OptError::InvalidEquality { index: Some(index), value } => {
                write!(f, "Equality coefficient at index {index} must be finite; got: {value}")
            }
            OptError::InvalidEquality { index: None, value } => {
                write!(f, "Equality target must be finite; got: {value}")
            }
            OptError::Infeasible { target, min_reachable, max_reachable } => {
                write!(
                    f,
                    "Infeasible constraint set: target {target} lies outside the reachable range [{min_reachable}, {max_reachable}]"
                )
            }
            OptError::InvalidStartPoint { index, value } => {
                write!(f, "Invalid starting point at index {index}: {value}, must be finite")
            }

            // ---- Objective ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Objective evaluated to a non-finite value: {value}")
            }
            OptError::Model(err) => {
                write!(f, "Model evaluation failed: {err}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidSolution { index, value, reason } => {
                write!(f, "Invalid solution at index {index}: {value}: {reason}")
            }
            OptError::MissingSolution => {
                write!(f, "Missing solution vector")
            }
            OptError::NotConverged { status, iterations } => {
                write!(f, "Optimizer did not converge after {iterations} iterations: {status}")
            }
            OptError::Timeout { iterations } => {
                write!(f, "Optimizer timed out after {iterations} iterations")
            }

            OptError::MissingState { what } => {
                write!(f, "Solver state is missing the {what}")
            }

            // ---- Backend ----
            OptError::Backend { kind, text } => {
                write!(f, "argmin backend error ({kind}): {text}")
            }
        }
    }
}

/// Recover crate errors that travelled through argmin as `Error`, then map
/// argmin's own error kinds.
impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        let original_err = match original_err.downcast::<ModelError>() {
            Ok(model_err) => return OptError::Model(model_err),
            Err(err) => err,
        };
        match original_err.downcast::<ArgminError>() {
            Ok(argmin_err) => {
                let kind = match &argmin_err {
                    ArgminError::InvalidParameter { .. } => "invalid parameter",
                    ArgminError::NotImplemented { .. } => "not implemented",
                    ArgminError::NotInitialized { .. } => "not initialized",
                    ArgminError::ConditionViolated { .. } => "condition violated",
                    ArgminError::CheckpointNotFound { .. } => "checkpoint not found",
                    ArgminError::PotentialBug { .. } => "potential bug",
                    ArgminError::ImpossibleError { .. } => "impossible error",
                    _ => "unknown",
                };
                OptError::Backend { kind, text: argmin_err.to_string() }
            }
            Err(err) => OptError::Backend { kind: "other", text: err.to_string() },
        }
    }
}

impl From<ModelError> for OptError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::GradientNotImplemented => OptError::GradientNotImplemented,
            other => OptError::Model(other),
        }
    }
}
