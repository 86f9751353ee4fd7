//! Standard normal distribution functions.
//!
//! - `norm_cdf`: Cumulative distribution function (CDF)
//! - `norm_pdf`: Probability density function (PDF)
//!
//! Both are generic over `T: Float`. The CDF delegates to
//! `statrs::function::erf::erfc`, which is accurate to near machine
//! precision in `f64`; implied volatility round-trips depend on it.

use num_traits::Float;
use statrs::function::erf::erfc;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Converts an `f64` constant into `T`.
#[inline]
fn constant<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

/// Standard normal cumulative distribution function.
///
/// Computes P(X <= x) where X ~ N(0, 1).
///
/// # Mathematical Definition
/// Φ(x) = (1/2) * erfc(-x / sqrt(2))
///
/// Using the complementary error function keeps full relative accuracy in
/// the lower tail, where `1 - Φ(-x)` would cancel.
///
/// # Examples
/// ```
/// use options_models::analytical::distributions::norm_cdf;
///
/// assert!((norm_cdf(0.0_f64) - 0.5).abs() < 1e-15);
/// assert!((norm_cdf(1.0_f64) - 0.841_344_746_068_542_9).abs() < 1e-14);
/// assert!(norm_cdf(-10.0_f64) > 0.0);
/// ```
#[inline]
pub fn norm_cdf<T: Float>(x: T) -> T {
    let arg = -x / constant::<T>(std::f64::consts::SQRT_2);
    match arg.to_f64() {
        Some(a) => constant::<T>(0.5 * erfc(a)),
        None => T::nan(),
    }
}

/// Standard normal probability density function.
///
/// φ(x) = (1 / sqrt(2π)) * exp(-x² / 2)
///
/// # Examples
/// ```
/// use options_models::analytical::distributions::norm_pdf;
///
/// // φ(0) = 1 / sqrt(2π)
/// assert!((norm_pdf(0.0_f64) - 0.398_942_280_4).abs() < 1e-10);
/// ```
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    let half = constant::<T>(0.5);
    constant::<T>(FRAC_1_SQRT_2PI) * (-half * x * x).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ==========================================================
    // norm_cdf tests
    // ==========================================================

    #[test]
    fn test_norm_cdf_at_zero() {
        assert_relative_eq!(norm_cdf(0.0_f64), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_norm_cdf_symmetry() {
        for x in [-5.0, -3.0, -1.5, -0.25, 0.0, 0.25, 1.5, 3.0, 5.0_f64] {
            assert_relative_eq!(norm_cdf(x) + norm_cdf(-x), 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_relative_eq!(norm_cdf(1.0_f64), 0.841_344_746_068_542_9, epsilon = 1e-14);
        assert_relative_eq!(norm_cdf(-1.0_f64), 0.158_655_253_931_457_05, epsilon = 1e-14);
        assert_relative_eq!(norm_cdf(2.0_f64), 0.977_249_868_051_820_8, epsilon = 1e-14);
        assert_relative_eq!(norm_cdf(-2.0_f64), 0.022_750_131_948_179_195, epsilon = 1e-14);
        assert_relative_eq!(norm_cdf(1.96_f64), 0.975_002_104_851_780, epsilon = 1e-12);
    }

    #[test]
    fn test_norm_cdf_lower_tail_relative_accuracy() {
        // Φ(-8) ≈ 6.22e-16; must not collapse to zero
        let tail = norm_cdf(-8.0_f64);
        assert!(tail > 0.0);
        assert_relative_eq!(tail, 6.220_960_574_271_785e-16, max_relative = 1e-8);
    }

    #[test]
    fn test_norm_cdf_monotonic() {
        let mut prev = 0.0;
        for i in -60..=60 {
            let value = norm_cdf(i as f64 * 0.1);
            assert!(value >= prev);
            prev = value;
        }
    }

    #[test]
    fn test_norm_cdf_infinities_and_nan() {
        assert_eq!(norm_cdf(f64::INFINITY), 1.0);
        assert_eq!(norm_cdf(f64::NEG_INFINITY), 0.0);
        assert!(norm_cdf(f64::NAN).is_nan());
    }

    #[test]
    fn test_norm_cdf_f32() {
        assert!((norm_cdf(1.0_f32) - 0.841_344_7).abs() < 1e-6);
    }

    // ==========================================================
    // norm_pdf tests
    // ==========================================================

    #[test]
    fn test_norm_pdf_reference_values() {
        assert_relative_eq!(norm_pdf(0.0_f64), FRAC_1_SQRT_2PI, epsilon = 1e-16);
        assert_relative_eq!(norm_pdf(1.0_f64), 0.241_970_724_519_143_37, epsilon = 1e-15);
        assert_relative_eq!(norm_pdf(-1.0_f64), norm_pdf(1.0_f64), epsilon = 1e-16);
    }

    #[test]
    fn test_norm_pdf_is_cdf_derivative() {
        let h = 1e-6;
        for x in [-2.0, -0.5, 0.0, 0.7, 1.9_f64] {
            let numeric = (norm_cdf(x + h) - norm_cdf(x - h)) / (2.0 * h);
            assert_relative_eq!(numeric, norm_pdf(x), epsilon = 1e-8);
        }
    }
}
