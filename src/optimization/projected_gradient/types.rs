//! projected_gradient::types — shared numeric aliases and solver wiring.
//!
//! Centralizes the vector, scalar and state types used by the projected
//! gradient solver so the rest of the module stays agnostic to `ndarray`
//! and argmin generics.
use argmin::core::IterState;
use ndarray::Array1;
use std::collections::HashMap;

/// Point in the optimizer's search space.
pub type Point = Array1<f64>;

/// Gradient vector, same shape as [`Point`].
pub type Grad = Array1<f64>;

/// Scalar cost minimized by the solver (negated objective).
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// argmin state carried between iterations.
pub type SpgState = IterState<Point, Grad, (), (), (), Cost>;

/// Default number of past costs the non-monotone line search compares
/// against.
pub const DEFAULT_NONMONOTONE_MEM: usize = 10;

/// Default iteration cap.
pub const DEFAULT_MAX_ITER: usize = 500;

/// Default projected-gradient tolerance.
pub const DEFAULT_TOL_GRAD: f64 = 1e-7;
