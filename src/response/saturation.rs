//! Hill saturation curve `x^k / (x^k + N^k)` and its derivative.
//!
//! Evaluated in the ratio form `1 / (1 + (N/x)^k)`, which stays in `[0, 1]`
//! without overflowing for large spend. Negative spend is clamped to zero,
//! and zero spend maps to zero.

/// Hill shape at spend `x` with half-saturation `n` and shape `k`.
///
/// Assumes `n > 0` and `k > 0` (validated by the model constructor).
#[inline]
pub fn hill(x: f64, n: f64, k: f64) -> f64 {
    let x = x.max(0.0);
    if x == 0.0 {
        return 0.0;
    }
    1.0 / (1.0 + (n / x).powf(k))
}

/// Derivative of [`hill`] with respect to `x`.
///
/// Uses `d/dx = (k / x) · s · (1 − s)` for `x > 0` and returns `0.0` for
/// `x <= 0` (the clamped region).
#[inline]
pub fn hill_derivative(x: f64, n: f64, k: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let s = hill(x, n, k);
    k / x * s * (1.0 - s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Match the textbook form on moderate inputs and hit 0.5 at x = N.
    fn hill_matches_direct_formula() {
        for &(x, n, k) in &[(0.5_f64, 1.2_f64, 2.0_f64), (1.5, 1.5, 3.0), (4.0, 2.1, 5.0), (0.01, 2.4, 6.0)] {
            let direct = x.powf(k) / (x.powf(k) + n.powf(k));
            assert!((hill(x, n, k) - direct).abs() < 1e-14, "x={x}, n={n}, k={k}");
        }
        assert!((hill(1.8, 1.8, 4.0) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn hill_clamps_and_saturates() {
        assert_eq!(hill(0.0, 1.0, 2.0), 0.0);
        assert_eq!(hill(-3.0, 1.0, 2.0), 0.0);
        assert!((hill(1e12, 1.0, 6.0) - 1.0).abs() < 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Analytic derivative agrees with a central difference.
    fn derivative_matches_central_difference() {
        let h = 1e-6;
        for &(x, n, k) in &[(0.7, 1.2, 2.0), (2.0, 1.5, 3.0), (2.5, 2.1, 5.0)] {
            let fd = (hill(x + h, n, k) - hill(x - h, n, k)) / (2.0 * h);
            assert!((hill_derivative(x, n, k) - fd).abs() < 1e-7, "x={x}");
        }
        assert_eq!(hill_derivative(-1.0, 1.0, 2.0), 0.0);
    }
}
