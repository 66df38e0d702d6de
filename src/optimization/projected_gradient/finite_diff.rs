//! projected_gradient::finite_diff — finite-difference gradients with error
//! capture.
//!
//! Purpose
//! -------
//! Approximate the gradient of a fallible scalar function when the objective
//! has no analytic gradient, without leaking the `finitediff` API into the
//! adapter.
//!
//! Key behaviors
//! -------------
//! - [`fd_gradient`] tries central differences first and retries with forward
//!   differences if the central pass hit an evaluation error or produced a
//!   non-finite gradient.
//! - [`run_fd_diff`] performs the forward pass and surfaces any captured
//!   error.
//!
//! Invariants & assumptions
//! ------------------------
//! - `finitediff` closures must return `f64`; evaluation errors are parked in
//!   a shared `RefCell<Option<Error>>` and the closure returns `NaN`.
//! - Returned gradients always pass [`validate_grad`].
use std::cell::RefCell;

use argmin::core::Error;
use finitediff::FiniteDiff;

use crate::optimization::projected_gradient::{
    types::{Grad, Point},
    validation::validate_grad,
};

/// Finite-difference gradient of a fallible function at `x`.
///
/// Central differences are preferred. If any evaluation fails or the result
/// is not finite, the gradient is recomputed with forward differences, which
/// only step in the positive direction.
///
/// # Errors
/// - The first error raised by `func` during the forward pass.
/// - [`OptError::InvalidGradient`](crate::optimization::errors::OptError::InvalidGradient)
///   if the forward-difference gradient is still non-finite.
pub fn fd_gradient<G>(x: &Point, func: G) -> Result<Grad, Error>
where
    G: Fn(&Point) -> Result<f64, Error>,
{
    let closure_err: RefCell<Option<Error>> = RefCell::new(None);
    let capture = |p: &Point| -> f64 {
        match func(p) {
            Ok(val) => val,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                f64::NAN
            }
        }
    };
    let fd_grad = x.central_diff(&capture);
    if closure_err.borrow().is_none() && validate_grad(&fd_grad, x.len()).is_ok() {
        return Ok(fd_grad);
    }
    run_fd_diff(x, &capture, &closure_err)
}

/// Forward-difference gradient of `func` at `x`, with error capture.
///
/// Clears `closure_err`, runs `forward_diff`, then returns the captured error
/// if one was recorded or the validated gradient otherwise.
///
/// # Errors
/// Any error captured inside `func`, or a validation error for the result.
pub fn run_fd_diff<G: Fn(&Point) -> f64>(
    x: &Point, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = x.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, x.len())?;
    Ok(fd_grad)
}
