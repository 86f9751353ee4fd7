//! Black-Scholes pricing model for European options.
//!
//! This module provides the Black-Scholes model for pricing European
//! call and put options on an underlying paying a continuous dividend
//! yield `q`.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T

use num_traits::Float;

use super::distributions::{norm_cdf, norm_pdf};
use super::error::AnalyticalError;

/// Expiries at or below this are treated as expired.
const EXPIRY_EPSILON: f64 = 1e-10;

/// A European call/put price pair for one strike and expiry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionPrices<T> {
    /// Call price
    pub call: T,
    /// Put price
    pub put: T,
}

/// Black-Scholes model for European option pricing.
///
/// Provides closed-form prices and vega under lognormal dynamics with a
/// continuous dividend yield.
///
/// # Type Parameters
/// * `T` - Floating-point type implementing `Float` (e.g., `f64`, `f32`)
///
/// # Examples
/// ```
/// use options_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0_f64, 0.05, 0.0, 0.2).unwrap();
/// let call_price = bs.price_call(100.0, 1.0);
/// let put_price = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call_price - put_price - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BlackScholes<T: Float> {
    /// Spot price (S)
    spot: T,
    /// Risk-free interest rate (r)
    rate: T,
    /// Continuous dividend yield (q)
    dividend_yield: T,
    /// Volatility (σ)
    volatility: T,
}

impl<T: Float> BlackScholes<T> {
    /// Creates a new Black-Scholes model.
    ///
    /// # Arguments
    /// * `spot` - Current spot price (must be positive)
    /// * `rate` - Risk-free interest rate (annualised, continuous)
    /// * `dividend_yield` - Dividend yield (annualised, continuous)
    /// * `volatility` - Volatility (must be positive)
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot <= 0
    /// - `AnalyticalError::InvalidVolatility` if volatility <= 0
    ///
    /// # Examples
    /// ```
    /// use options_models::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::new(100.0_f64, 0.05, 0.01, 0.2).is_ok());
    /// assert!(BlackScholes::new(-100.0_f64, 0.05, 0.0, 0.2).is_err());
    /// assert!(BlackScholes::new(100.0_f64, 0.05, 0.0, 0.0).is_err());
    /// ```
    pub fn new(spot: T, rate: T, dividend_yield: T, volatility: T) -> Result<Self, AnalyticalError> {
        let zero = T::zero();

        // Negated comparisons also reject NaN
        if !(spot > zero) {
            return Err(AnalyticalError::InvalidSpot {
                spot: spot.to_f64().unwrap_or(f64::NAN),
            });
        }

        if !(volatility > zero) {
            return Err(AnalyticalError::InvalidVolatility {
                volatility: volatility.to_f64().unwrap_or(f64::NAN),
            });
        }

        Ok(Self {
            spot,
            rate,
            dividend_yield,
            volatility,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> T {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }

    /// Returns the dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> T {
        self.dividend_yield
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> T {
        self.volatility
    }

    /// Returns a copy of the model with a different volatility.
    ///
    /// # Errors
    /// `AnalyticalError::InvalidVolatility` if volatility <= 0.
    pub fn with_volatility(&self, volatility: T) -> Result<Self, AnalyticalError> {
        Self::new(self.spot, self.rate, self.dividend_yield, volatility)
    }

    #[inline]
    fn is_expired(expiry: T) -> bool {
        expiry <= T::from(EXPIRY_EPSILON).unwrap_or_else(T::epsilon)
    }

    /// Computes the d1 term of the Black-Scholes formula.
    ///
    /// d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
    ///
    /// At expiry returns ±100 (or 0 at the money) as a stand-in for ±∞.
    #[inline]
    pub fn d1(&self, strike: T, expiry: T) -> T {
        if Self::is_expired(expiry) {
            let large = T::from(100.0).unwrap_or_else(T::max_value);
            return if self.spot > strike {
                large
            } else if self.spot < strike {
                -large
            } else {
                T::zero()
            };
        }

        let half = T::from(0.5).unwrap_or_else(T::nan);
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let log_moneyness = (self.spot / strike).ln();
        let drift =
            (self.rate - self.dividend_yield + half * self.volatility * self.volatility) * expiry;

        (log_moneyness + drift) / vol_sqrt_t
    }

    /// Computes the d2 term of the Black-Scholes formula.
    ///
    /// d₂ = d₁ - σ√T
    #[inline]
    pub fn d2(&self, strike: T, expiry: T) -> T {
        if Self::is_expired(expiry) {
            return self.d1(strike, expiry);
        }
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// Computes the European call option price.
    ///
    /// C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
    ///
    /// At expiry returns the intrinsic value `max(S - K, 0)`.
    ///
    /// # Examples
    /// ```
    /// use options_models::analytical::BlackScholes;
    ///
    /// let bs = BlackScholes::new(100.0_f64, 0.05, 0.0, 0.2).unwrap();
    /// assert!((bs.price_call(100.0, 1.0) - 10.4506).abs() < 1e-4);
    /// ```
    #[inline]
    pub fn price_call(&self, strike: T, expiry: T) -> T {
        if Self::is_expired(expiry) {
            return (self.spot - strike).max(T::zero());
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let spot_fwd = self.spot * (-self.dividend_yield * expiry).exp();
        let discount = (-self.rate * expiry).exp();

        spot_fwd * norm_cdf(d1) - strike * discount * norm_cdf(d2)
    }

    /// Computes the European put option price.
    ///
    /// P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
    ///
    /// At expiry returns the intrinsic value `max(K - S, 0)`.
    ///
    /// # Examples
    /// ```
    /// use options_models::analytical::BlackScholes;
    ///
    /// let bs = BlackScholes::new(100.0_f64, 0.05, 0.0, 0.2).unwrap();
    /// assert!((bs.price_put(100.0, 1.0) - 5.5735).abs() < 1e-4);
    /// ```
    #[inline]
    pub fn price_put(&self, strike: T, expiry: T) -> T {
        if Self::is_expired(expiry) {
            return (strike - self.spot).max(T::zero());
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let spot_fwd = self.spot * (-self.dividend_yield * expiry).exp();
        let discount = (-self.rate * expiry).exp();

        strike * discount * norm_cdf(-d2) - spot_fwd * norm_cdf(-d1)
    }

    /// Computes both call and put prices.
    pub fn prices(&self, strike: T, expiry: T) -> OptionPrices<T> {
        OptionPrices {
            call: self.price_call(strike, expiry),
            put: self.price_put(strike, expiry),
        }
    }

    /// Computes Vega (∂V/∂σ).
    ///
    /// Vega = S·e^(-qT)·φ(d₁)·√T
    ///
    /// Same for calls and puts; zero at expiry.
    #[inline]
    pub fn vega(&self, strike: T, expiry: T) -> T {
        if Self::is_expired(expiry) {
            return T::zero();
        }

        let d1 = self.d1(strike, expiry);
        self.spot * (-self.dividend_yield * expiry).exp() * norm_pdf(d1) * expiry.sqrt()
    }
}

/// Prices a European call and put in one call.
///
/// Unlike [`BlackScholes::price_call`], which returns intrinsic value at
/// expiry, this rejects every degenerate input.
///
/// # Arguments
/// * `spot` - Current stock price (S)
/// * `strike` - Strike price (K)
/// * `rate` - Risk-free rate, continuous (r)
/// * `dividend_yield` - Dividend yield, continuous (q)
/// * `expiry` - Time to expiry in years (T)
/// * `volatility` - Annualised volatility (σ)
///
/// # Errors
/// An `AnalyticalError` unless `spot`, `strike`, `expiry` and `volatility`
/// are all strictly positive.
///
/// # Examples
/// ```
/// use options_models::analytical::black_scholes_option_price;
///
/// let prices = black_scholes_option_price(100.0_f64, 100.0, 0.05, 0.0, 1.0, 0.2).unwrap();
/// assert!((prices.call - 10.4506).abs() < 1e-4);
/// assert!((prices.put - 5.5735).abs() < 1e-4);
///
/// assert!(black_scholes_option_price(100.0, 100.0, 0.05, 0.0, 0.0, 0.2).is_err());
/// ```
pub fn black_scholes_option_price<T: Float>(
    spot: T,
    strike: T,
    rate: T,
    dividend_yield: T,
    expiry: T,
    volatility: T,
) -> Result<OptionPrices<T>, AnalyticalError> {
    let zero = T::zero();

    if !(strike > zero) {
        return Err(AnalyticalError::InvalidStrike {
            strike: strike.to_f64().unwrap_or(f64::NAN),
        });
    }
    if !(expiry > zero) {
        return Err(AnalyticalError::InvalidExpiry {
            expiry: expiry.to_f64().unwrap_or(f64::NAN),
        });
    }

    let model = BlackScholes::new(spot, rate, dividend_yield, volatility)?;
    Ok(model.prices(strike, expiry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ==========================================================
    // Constructor tests
    // ==========================================================

    #[test]
    fn test_new_valid_parameters() {
        let bs = BlackScholes::new(100.0_f64, 0.05, 0.02, 0.2).unwrap();
        assert_eq!(bs.spot(), 100.0);
        assert_eq!(bs.rate(), 0.05);
        assert_eq!(bs.dividend_yield(), 0.02);
        assert_eq!(bs.volatility(), 0.2);
    }

    #[test]
    fn test_new_invalid_spot() {
        for spot in [-100.0, 0.0, f64::NAN] {
            let result = BlackScholes::new(spot, 0.05, 0.0, 0.2);
            assert!(matches!(result, Err(AnalyticalError::InvalidSpot { .. })));
        }
    }

    #[test]
    fn test_new_invalid_volatility() {
        for vol in [-0.2, 0.0, f64::NAN] {
            let result = BlackScholes::new(100.0, 0.05, 0.0, vol);
            assert!(matches!(result, Err(AnalyticalError::InvalidVolatility { .. })));
        }
    }

    #[test]
    fn test_new_negative_rate_and_yield_allowed() {
        assert!(BlackScholes::new(100.0_f64, -0.01, -0.005, 0.2).is_ok());
    }

    #[test]
    fn test_with_volatility() {
        let bs = BlackScholes::new(100.0_f64, 0.05, 0.01, 0.2).unwrap();
        let bumped = bs.with_volatility(0.3).unwrap();
        assert_eq!(bumped.volatility(), 0.3);
        assert_eq!(bumped.dividend_yield(), 0.01);
        assert!(bs.with_volatility(-1.0).is_err());
    }

    // ==========================================================
    // d1 / d2 tests
    // ==========================================================

    #[test]
    fn test_d1_d2_atm() {
        let bs = BlackScholes::new(100.0_f64, 0.05, 0.0, 0.2).unwrap();
        assert_relative_eq!(bs.d1(100.0, 1.0), 0.35, epsilon = 1e-12);
        assert_relative_eq!(bs.d2(100.0, 1.0), 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_d1_with_dividend_yield() {
        let bs = BlackScholes::new(100.0_f64, 0.05, 0.02, 0.2).unwrap();
        assert_relative_eq!(bs.d1(100.0, 1.0), 0.25, epsilon = 1e-12);
        assert_relative_eq!(bs.d2(100.0, 1.0), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_d1_expiry_zero() {
        let bs = BlackScholes::new(100.0_f64, 0.05, 0.0, 0.2).unwrap();
        assert!(bs.d1(90.0, 0.0) > 10.0);
        assert!(bs.d1(110.0, 0.0) < -10.0);
        assert_eq!(bs.d1(100.0, 0.0), 0.0);
    }

    // ==========================================================
    // Price tests
    // ==========================================================

    #[test]
    fn test_reference_values_no_dividend() {
        let bs = BlackScholes::new(100.0_f64, 0.05, 0.0, 0.2).unwrap();
        assert_relative_eq!(bs.price_call(100.0, 1.0), 10.450_583_572_185_565, epsilon = 1e-10);
        assert_relative_eq!(bs.price_put(100.0, 1.0), 5.573_526_022_256_971, epsilon = 1e-10);
    }

    #[test]
    fn test_reference_values_with_dividend() {
        let bs = BlackScholes::new(100.0_f64, 0.05, 0.02, 0.2).unwrap();
        let prices = bs.prices(100.0, 1.0);
        assert_relative_eq!(prices.call, 9.227_005_508_154_036, epsilon = 1e-10);
        assert_relative_eq!(prices.put, 6.330_080_627_549_918, epsilon = 1e-10);
    }

    #[test]
    fn test_hull_textbook_example() {
        // S=42, K=40, r=10%, σ=20%, T=0.5
        let bs = BlackScholes::new(42.0_f64, 0.1, 0.0, 0.2).unwrap();
        assert_relative_eq!(bs.price_call(40.0, 0.5), 4.759_422_392_871_535, epsilon = 1e-10);
        assert_relative_eq!(bs.price_put(40.0, 0.5), 0.808_599_372_900_095_8, epsilon = 1e-10);
    }

    #[test]
    fn test_put_call_parity_with_dividend() {
        let (s, r, q, vol) = (100.0_f64, 0.03, 0.01, 0.3);
        let bs = BlackScholes::new(s, r, q, vol).unwrap();
        for strike in [70.0, 90.0, 110.0, 140.0] {
            for expiry in [0.1, 0.5, 2.0] {
                let lhs = bs.price_call(strike, expiry) - bs.price_put(strike, expiry);
                let rhs = s * (-q * expiry).exp() - strike * (-r * expiry).exp();
                assert_relative_eq!(lhs, rhs, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_expiry_zero_intrinsic() {
        let bs = BlackScholes::new(100.0_f64, 0.05, 0.0, 0.2).unwrap();
        assert_eq!(bs.price_call(90.0, 0.0), 10.0);
        assert_eq!(bs.price_call(110.0, 0.0), 0.0);
        assert_eq!(bs.price_put(110.0, 0.0), 10.0);
        assert_eq!(bs.price_put(90.0, 0.0), 0.0);
    }

    #[test]
    fn test_deep_otm_call_near_zero() {
        let bs = BlackScholes::new(100.0_f64, 0.05, 0.0, 0.2).unwrap();
        let price = bs.price_call(300.0, 0.25);
        assert!(price >= 0.0);
        assert!(price < 1e-10);
    }

    #[test]
    fn test_call_increasing_in_volatility() {
        let mut prev = 0.0;
        for i in 1..=40 {
            let vol = i as f64 * 0.05;
            let price = BlackScholes::new(100.0_f64, 0.05, 0.0, vol)
                .unwrap()
                .price_call(105.0, 0.75);
            assert!(price > prev);
            prev = price;
        }
    }

    // ==========================================================
    // Vega tests
    // ==========================================================

    #[test]
    fn test_vega_reference_value() {
        let bs = BlackScholes::new(100.0_f64, 0.03, 0.01, 0.3).unwrap();
        assert_relative_eq!(bs.vega(110.0, 0.5), 26.864_975_451_964_604, epsilon = 1e-9);
    }

    #[test]
    fn test_vega_matches_finite_difference() {
        let bs = BlackScholes::new(100.0_f64, 0.05, 0.02, 0.25).unwrap();
        let h = 1e-5;
        let up = bs.with_volatility(0.25 + h).unwrap().price_call(95.0, 1.5);
        let down = bs.with_volatility(0.25 - h).unwrap().price_call(95.0, 1.5);
        assert_relative_eq!((up - down) / (2.0 * h), bs.vega(95.0, 1.5), epsilon = 1e-5);
    }

    #[test]
    fn test_vega_zero_at_expiry() {
        let bs = BlackScholes::new(100.0_f64, 0.05, 0.0, 0.2).unwrap();
        assert_eq!(bs.vega(100.0, 0.0), 0.0);
    }

    // ==========================================================
    // Free function tests
    // ==========================================================

    #[test]
    fn test_option_price_function_matches_model() {
        let prices = black_scholes_option_price(100.0_f64, 110.0, 0.03, 0.01, 0.5, 0.3).unwrap();
        assert_relative_eq!(prices.call, 5.045_942_667_030_800_5, epsilon = 1e-10);
        assert_relative_eq!(prices.put, 13.907_008_104_099_475, epsilon = 1e-10);
    }

    #[test]
    fn test_option_price_function_rejects_invalid_inputs() {
        assert!(matches!(
            black_scholes_option_price(0.0_f64, 100.0, 0.05, 0.0, 1.0, 0.2),
            Err(AnalyticalError::InvalidSpot { .. })
        ));
        assert!(matches!(
            black_scholes_option_price(100.0_f64, -5.0, 0.05, 0.0, 1.0, 0.2),
            Err(AnalyticalError::InvalidStrike { .. })
        ));
        assert!(matches!(
            black_scholes_option_price(100.0_f64, 100.0, 0.05, 0.0, 0.0, 0.2),
            Err(AnalyticalError::InvalidExpiry { .. })
        ));
        assert!(matches!(
            black_scholes_option_price(100.0_f64, 100.0, 0.05, 0.0, 1.0, 0.0),
            Err(AnalyticalError::InvalidVolatility { .. })
        ));
    }

    #[test]
    fn test_with_f32() {
        let bs = BlackScholes::new(100.0_f32, 0.05, 0.0, 0.2).unwrap();
        assert!((bs.price_call(100.0, 1.0) - 10.4506).abs() < 1e-3);
    }
}
