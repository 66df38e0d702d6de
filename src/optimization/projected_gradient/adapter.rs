//! Adapter that exposes a user [`Objective`] as an `argmin` problem.
//!
//! We convert a *maximization* of `f(x)` into a *minimization* by defining the
//! cost as `c(x) = -f(x)`. Analytic gradients (if provided) are negated
//! accordingly. Without one, we finite-difference the **cost**, so no sign
//! flip is needed in that branch.
use argmin::core::{CostFunction, Error, Gradient};

use crate::optimization::{
    errors::OptError,
    projected_gradient::{
        finite_diff::fd_gradient,
        traits::Objective,
        types::{Cost, Grad, Point},
        validation::validate_grad,
    },
};

/// Bridges a user [`Objective`] to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-f(x)`.
/// - `Gradient::gradient` returns `-∇f(x)` if the objective provides an
///   analytic gradient, or a finite-difference gradient of the cost.
#[derive(Debug)]
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: Objective> Clone for ArgMinAdapter<'a, F> {
    fn clone(&self) -> Self {
        Self { f: self.f, data: self.data }
    }
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: Objective> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Point;
    type Output = Cost;

    /// Evaluate `c(x) = -f(x)`.
    ///
    /// # Errors
    /// Propagates errors from `value`; returns
    /// [`OptError::NonFiniteCost`] for a non-finite objective.
    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(x, self.data)?;
        if !output.is_finite() {
            return Err(OptError::NonFiniteCost { value: output }.into());
        }
        Ok(-output)
    }
}

impl<'a, F: Objective> Gradient for ArgMinAdapter<'a, F> {
    type Param = Point;
    type Gradient = Grad;

    /// Evaluate `∇c(x)`.
    ///
    /// - Analytic gradients are validated and negated.
    /// - [`OptError::GradientNotImplemented`] switches to
    ///   [`fd_gradient`] over the cost.
    ///
    /// # Errors
    /// Propagates any other error from `grad`, errors raised by cost
    /// evaluations during finite differencing, and validation errors.
    fn gradient(&self, x: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(x, self.data) {
            Ok(g) => {
                validate_grad(&g, x.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => fd_gradient(x, |p| self.cost(p)),
            Err(e) => Err(e.into()),
        }
    }
}
