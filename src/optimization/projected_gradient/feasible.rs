//! projected_gradient::feasible — box ∩ hyperplane feasible region.
//!
//! Purpose
//! -------
//! Represent `{ x : lower ≤ x ≤ upper, a·x = b }` (the equality is optional)
//! and compute exact Euclidean projections onto it.
//!
//! Key behaviors
//! -------------
//! - [`FeasibleRegion::new`] validates dimensions and finiteness, then rejects
//!   empty regions up front by comparing `b` with the range of `a·x` over
//!   the box.
//! - [`FeasibleRegion::project`] returns `x(μ) = clamp(y − μ·a, lower, upper)`
//!   for the multiplier `μ` that solves `a·x(μ) = b`. `a·x(μ)` is piecewise
//!   linear and non-increasing in `μ`, so `μ` is found by a binary search over
//!   the sorted breakpoints followed by linear interpolation on the bracketing
//!   segment, then a one-step correction on the free coordinates.
//! - [`FeasibleRegion::projected_gradient_norm`] gives the stationarity
//!   measure `‖P(x − g) − x‖∞` used for convergence.
//!
//! Invariants & assumptions
//! ------------------------
//! - `lower ≤ upper`, all finite; coefficients and target finite.
//! - A constructed region is non-empty (up to a relative tolerance).
use ndarray::Zip;

use crate::optimization::{
    errors::{OptError, OptResult},
    projected_gradient::types::{Grad, Point},
};

/// Relative slack allowed when deciding whether a target is reachable.
const FEASIBILITY_RTOL: f64 = 1e-9;

/// Linear equality `coeffs · x = target`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearEquality {
    coeffs: Point,
    target: f64,
}

impl LinearEquality {
    /// # Errors
    /// Returns [`OptError::InvalidEquality`] for a non-finite coefficient
    /// (with its index) or target (index `None`).
    pub fn new(coeffs: Point, target: f64) -> OptResult<Self> {
        if let Some((index, &value)) = coeffs.iter().enumerate().find(|(_, c)| !c.is_finite()) {
            return Err(OptError::InvalidEquality { index: Some(index), value });
        }
        if !target.is_finite() {
            return Err(OptError::InvalidEquality { index: None, value: target });
        }
        Ok(Self { coeffs, target })
    }

    pub fn coeffs(&self) -> &Point {
        &self.coeffs
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// `coeffs · x − target`.
    pub fn residual(&self, x: &Point) -> f64 {
        self.coeffs.dot(x) - self.target
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeasibleRegion {
    lower: Point,
    upper: Point,
    equality: Option<LinearEquality>,
}

impl FeasibleRegion {
    /// Build a validated, non-empty region.
    ///
    /// # Errors
    /// - [`OptError::DimensionMismatch`] if `upper` or the coefficients do not
    ///   match `lower`'s length.
    /// - [`OptError::InvalidBoxBound`] for a non-finite or inverted pair.
    /// - [`OptError::Infeasible`] if no point of the box satisfies the
    ///   equality.
    pub fn new(lower: Point, upper: Point, equality: Option<LinearEquality>) -> OptResult<Self> {
        let dim = lower.len();
        if upper.len() != dim {
            return Err(OptError::DimensionMismatch {
                what: "upper bounds",
                expected: dim,
                found: upper.len(),
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(OptError::InvalidBoxBound { index, lower: lo, upper: hi });
            }
        }
        let region = Self { lower, upper, equality };
        if let Some(eq) = &region.equality {
            if eq.coeffs.len() != dim {
                return Err(OptError::DimensionMismatch {
                    what: "equality coefficients",
                    expected: dim,
                    found: eq.coeffs.len(),
                });
            }
            let (min_reachable, max_reachable) = region.reachable_range(eq);
            let slack = FEASIBILITY_RTOL * region.magnitude(eq);
            if eq.target < min_reachable - slack || eq.target > max_reachable + slack {
                return Err(OptError::Infeasible {
                    target: eq.target,
                    min_reachable,
                    max_reachable,
                });
            }
        }
        Ok(region)
    }

    /// Box-only region.
    pub fn from_box(lower: Point, upper: Point) -> OptResult<Self> {
        Self::new(lower, upper, None)
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &Point {
        &self.lower
    }

    pub fn upper(&self) -> &Point {
        &self.upper
    }

    pub fn equality(&self) -> Option<&LinearEquality> {
        self.equality.as_ref()
    }

    /// Whether `x` lies in the region up to `tol` (absolute on the box,
    /// relative on the equality).
    pub fn contains(&self, x: &Point, tol: f64) -> bool {
        if x.len() != self.dim() {
            return false;
        }
        let in_box = Zip::from(x)
            .and(&self.lower)
            .and(&self.upper)
            .all(|&v, &lo, &hi| v >= lo - tol && v <= hi + tol);
        let on_plane = self
            .equality
            .as_ref()
            .is_none_or(|eq| eq.residual(x).abs() <= tol * self.magnitude(eq));
        in_box && on_plane
    }

    /// Euclidean projection of `y` onto the region.
    pub fn project(&self, y: &Point) -> Point {
        match &self.equality {
            Some(eq) if eq.coeffs.iter().any(|&c| c != 0.0) => self.project_onto_slice(y, eq),
            _ => self.clamp(y),
        }
    }

    /// `‖P(x − g) − x‖∞`; zero exactly at stationary points of a smooth
    /// function over the region.
    pub fn projected_gradient_norm(&self, x: &Point, grad: &Grad) -> f64 {
        let stepped = self.project(&(x - grad));
        Zip::from(&stepped).and(x).fold(0.0_f64, |acc, &p, &v| acc.max((p - v).abs()))
    }

    // ---- Helper Methods ----

    fn clamp(&self, y: &Point) -> Point {
        Zip::from(y).and(&self.lower).and(&self.upper).map_collect(|&v, &lo, &hi| v.clamp(lo, hi))
    }

    /// `clamp(y − μ·a, lower, upper)`.
    fn shifted(&self, y: &Point, coeffs: &Point, mu: f64) -> Point {
        Zip::from(y)
            .and(coeffs)
            .and(&self.lower)
            .and(&self.upper)
            .map_collect(|&v, &a, &lo, &hi| (v - mu * a).clamp(lo, hi))
    }

    fn project_onto_slice(&self, y: &Point, eq: &LinearEquality) -> Point {
        let coeffs = &eq.coeffs;
        let target = eq.target;
        let phi = |mu: f64| coeffs.dot(&self.shifted(y, coeffs, mu));

        let mut breakpoints: Vec<f64> = Zip::from(y)
            .and(coeffs)
            .and(&self.lower)
            .and(&self.upper)
            .fold(Vec::with_capacity(2 * self.dim()), |mut acc, &v, &a, &lo, &hi| {
                if a != 0.0 {
                    acc.push((v - lo) / a);
                    acc.push((v - hi) / a);
                }
                acc
            });
        breakpoints.sort_by(f64::total_cmp);
        breakpoints.dedup();

        // phi is non-increasing; its extremes are attained at the outer
        // breakpoints.
        let first = breakpoints[0];
        let last = breakpoints[breakpoints.len() - 1];
        let mu = if phi(first) <= target {
            first
        } else if phi(last) >= target {
            last
        } else {
            let (mut lo, mut hi) = (0, breakpoints.len() - 1);
            while hi - lo > 1 {
                let mid = lo + (hi - lo) / 2;
                if phi(breakpoints[mid]) >= target {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            let (m0, m1) = (breakpoints[lo], breakpoints[hi]);
            let (p0, p1) = (phi(m0), phi(m1));
            if p0 > p1 { m0 + (p0 - target) * (m1 - m0) / (p0 - p1) } else { m0 }
        };

        let mut x = self.shifted(y, coeffs, mu);
        self.correct_residual(&mut x, eq);
        x
    }

    /// Remove the remaining rounding residual along the free coordinates.
    fn correct_residual(&self, x: &mut Point, eq: &LinearEquality) {
        let residual = eq.residual(x);
        if residual == 0.0 {
            return;
        }
        let free_norm: f64 = Zip::from(&*x)
            .and(&eq.coeffs)
            .and(&self.lower)
            .and(&self.upper)
            .fold(0.0, |acc, &v, &a, &lo, &hi| if v > lo && v < hi { acc + a * a } else { acc });
        if free_norm == 0.0 {
            return;
        }
        Zip::from(x).and(&eq.coeffs).and(&self.lower).and(&self.upper).for_each(
            |v, &a, &lo, &hi| {
                if *v > lo && *v < hi {
                    *v = (*v - residual * a / free_norm).clamp(lo, hi);
                }
            },
        );
    }

    /// `[min, max]` of `a·x` over the box.
    fn reachable_range(&self, eq: &LinearEquality) -> (f64, f64) {
        Zip::from(&eq.coeffs).and(&self.lower).and(&self.upper).fold(
            (0.0, 0.0),
            |(min, max), &a, &lo, &hi| {
                let (p, q) = (a * lo, a * hi);
                (min + p.min(q), max + p.max(q))
            },
        )
    }

    /// Scale used to turn the relative feasibility tolerance into an
    /// absolute one.
    fn magnitude(&self, eq: &LinearEquality) -> f64 {
        let box_scale = Zip::from(&eq.coeffs)
            .and(&self.lower)
            .and(&self.upper)
            .fold(0.0, |acc, &a, &lo, &hi| acc + a.abs() * lo.abs().max(hi.abs()));
        box_scale.max(eq.target.abs()).max(1.0)
    }
}
