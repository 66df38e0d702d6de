//! Validation helpers for the projected-gradient optimizer.
//!
//! - Tolerance checks: [`verify_tol_grad`], [`verify_tol_cost`].
//! - Gradient validation: [`validate_grad`].
//! - Solution and value checks: [`validate_solution`], [`validate_value`].
//! - Starting point check: [`validate_start`].
//!
//! All helpers report the first offending element as a specific
//! [`OptError`] variant.
use crate::optimization::{
    errors::{OptError, OptResult},
    projected_gradient::types::{Grad, Point},
};

/// Validate the optional projected-gradient tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional relative cost-change tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] for the first non-finite element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap the solver's best point.
///
/// # Errors
/// - [`OptError::MissingSolution`] if no vector was provided.
/// - [`OptError::InvalidSolution`] if any element is non-finite.
pub fn validate_solution(solution: Option<Point>) -> OptResult<Point> {
    let x = solution.ok_or(OptError::MissingSolution)?;
    for (index, &value) in x.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidSolution {
                index,
                value,
                reason: "Solution coordinates must be finite.",
            });
        }
    }
    Ok(x)
}

/// Validate that a scalar objective value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate a starting point's dimension and finiteness.
///
/// # Errors
/// - [`OptError::DimensionMismatch`] for a wrong length.
/// - [`OptError::InvalidStartPoint`] for the first non-finite coordinate.
pub fn validate_start(x0: &Point, dim: usize) -> OptResult<()> {
    if x0.len() != dim {
        return Err(OptError::DimensionMismatch {
            what: "starting point",
            expected: dim,
            found: x0.len(),
        });
    }
    if let Some((index, &value)) = x0.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidStartPoint { index, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn tolerances_must_be_positive_and_finite() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-8)).is_ok());
        assert!(matches!(verify_tol_grad(Some(0.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(
            verify_tol_cost(Some(f64::INFINITY)),
            Err(OptError::InvalidTolCost { .. })
        ));
    }

    #[test]
    fn grad_and_solution_checks_report_first_offender() {
        assert_eq!(
            validate_grad(&array![1.0, 2.0], 3).unwrap_err(),
            OptError::GradientDimMismatch { expected: 3, found: 2 }
        );
        assert!(matches!(
            validate_grad(&array![1.0, f64::NAN], 2),
            Err(OptError::InvalidGradient { index: 1, .. })
        ));
        assert_eq!(validate_solution(None).unwrap_err(), OptError::MissingSolution);
        assert!(matches!(
            validate_solution(Some(array![0.0, f64::INFINITY])),
            Err(OptError::InvalidSolution { index: 1, .. })
        ));
        assert!(matches!(
            validate_start(&array![f64::NAN], 1),
            Err(OptError::InvalidStartPoint { index: 0, .. })
        ));
    }
}
