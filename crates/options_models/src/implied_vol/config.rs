//! Implied volatility solver settings.

use options_core::math::solvers::SolverConfig;

use super::error::ImpliedVolError;

/// Settings for [`ImpliedVolSolver`](super::ImpliedVolSolver).
///
/// Defaults:
///
/// | Field            | Default        |
/// |------------------|----------------|
/// | `sigma_init`     | 0.1            |
/// | `newton`         | 1e-6, 100 its  |
/// | `brent`          | 2e-12, 100 its |
/// | `bracket`        | [1e-9, 5.0]    |
/// | `floor`          | 1e-9           |
///
/// # Example
///
/// ```
/// use options_models::implied_vol::ImpliedVolConfig;
///
/// let config = ImpliedVolConfig::default().with_sigma_init(0.25);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.sigma_init, 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpliedVolConfig {
    /// Newton starting volatility.
    pub sigma_init: f64,
    /// Newton tolerance and iteration cap.
    pub newton: SolverConfig<f64>,
    /// Brent tolerance and iteration cap.
    pub brent: SolverConfig<f64>,
    /// Lower end of the Brent volatility bracket.
    pub bracket_lower: f64,
    /// Upper end of the Brent volatility bracket.
    pub bracket_upper: f64,
    /// Volatility reported when neither solver finds a root.
    pub floor: f64,
}

impl Default for ImpliedVolConfig {
    fn default() -> Self {
        Self {
            sigma_init: 0.1,
            newton: SolverConfig::new(1e-6, 100),
            brent: SolverConfig::new(2e-12, 100),
            bracket_lower: 1e-9,
            bracket_upper: 5.0,
            floor: 1e-9,
        }
    }
}

impl ImpliedVolConfig {
    /// Sets the Newton starting volatility.
    pub fn with_sigma_init(mut self, sigma_init: f64) -> Self {
        self.sigma_init = sigma_init;
        self
    }

    /// Sets the Newton tolerance and iteration cap.
    pub fn with_newton(mut self, newton: SolverConfig<f64>) -> Self {
        self.newton = newton;
        self
    }

    /// Sets the Brent tolerance and iteration cap.
    pub fn with_brent(mut self, brent: SolverConfig<f64>) -> Self {
        self.brent = brent;
        self
    }

    /// Sets the Brent volatility bracket.
    pub fn with_bracket(mut self, lower: f64, upper: f64) -> Self {
        self.bracket_lower = lower;
        self.bracket_upper = upper;
        self
    }

    /// Sets the floor volatility.
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    /// Checks that every volatility setting is positive and the bracket is
    /// ordered.
    ///
    /// # Errors
    /// `ImpliedVolError::InvalidParameter` naming the first bad field.
    pub fn validate(&self) -> Result<(), ImpliedVolError> {
        let positive = [
            ("sigma_init", self.sigma_init),
            ("bracket_lower", self.bracket_lower),
            ("bracket_upper", self.bracket_upper),
            ("floor", self.floor),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ImpliedVolError::InvalidParameter { name, value });
            }
        }
        if self.bracket_upper <= self.bracket_lower {
            return Err(ImpliedVolError::InvalidParameter {
                name: "bracket_upper",
                value: self.bracket_upper,
            });
        }
        Ok(())
    }
}
