//! Geometric Brownian Motion path generation.
//!
//! Prices evolve under the exact log-space scheme:
//!
//! ```text
//! ln S(t+dt) = ln S(t) + (r - σ²/2)dt + σ√dt·Z,   Z ~ N(0, 1)
//! ```
//!
//! with `dt = 1 / steps_per_year` and `N = floor(steps_per_year · T)` steps.
//! A path therefore has `N + 1` points, starting at `S₀` at time 0 and
//! ending at time `T` on the time grid `linspace(0, T, N + 1)`.
//!
//! Three entry points share one random stream layout (path by path, `N`
//! normals each), so for a given seed [`gbm_paths`] and
//! [`gbm_terminal_prices`] agree on every terminal price.

use crate::config::{DEFAULT_STEPS_PER_YEAR, MAX_PATHS, MAX_STEPS};
use crate::distribution::linspace;
use crate::error::{ConfigError, SimulationError};
use crate::rng::McRng;

/// Parameters for Geometric Brownian Motion path generation.
///
/// # Examples
///
/// ```rust
/// use options_mc::paths::GbmParams;
///
/// let params = GbmParams::new(100.0, 0.05, 0.2, 0.5);
/// assert_eq!(params.steps_per_year, 252);
/// assert_eq!(params.n_steps(), 126);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmParams {
    /// Initial spot price (S₀).
    pub spot: f64,
    /// Drift rate (r), annualised.
    pub rate: f64,
    /// Volatility (σ), annualised.
    pub volatility: f64,
    /// Horizon (T) in years.
    pub maturity: f64,
    /// Time steps per year.
    pub steps_per_year: usize,
}

impl GbmParams {
    /// Creates parameters with the default 252 steps per year.
    #[inline]
    pub fn new(spot: f64, rate: f64, volatility: f64, maturity: f64) -> Self {
        Self {
            spot,
            rate,
            volatility,
            maturity,
            steps_per_year: DEFAULT_STEPS_PER_YEAR,
        }
    }

    /// Returns a copy with a different step frequency.
    #[inline]
    pub fn with_steps_per_year(mut self, steps_per_year: usize) -> Self {
        self.steps_per_year = steps_per_year;
        self
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// `SimulationError::InvalidParameter` if spot, volatility or maturity
    /// is not strictly positive, the rate is not finite, or the maturity
    /// needs more than [`MAX_STEPS`] steps;
    /// `SimulationError::Config` if `steps_per_year` is zero.
    pub fn validate(&self) -> Result<(), SimulationError> {
        for (name, value) in [
            ("spot", self.spot),
            ("volatility", self.volatility),
            ("maturity", self.maturity),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimulationError::InvalidParameter { name, value });
            }
        }
        if !self.rate.is_finite() {
            return Err(SimulationError::InvalidParameter {
                name: "rate",
                value: self.rate,
            });
        }
        if self.steps_per_year == 0 {
            return Err(ConfigError::InvalidStepsPerYear(0).into());
        }
        // Compared in f64 before the usize cast in `n_steps` can saturate
        if (self.steps_per_year as f64 * self.maturity).floor() > MAX_STEPS as f64 {
            return Err(SimulationError::InvalidParameter {
                name: "maturity",
                value: self.maturity,
            });
        }
        Ok(())
    }

    /// Number of steps, `floor(steps_per_year · T)`.
    #[inline]
    pub fn n_steps(&self) -> usize {
        (self.steps_per_year as f64 * self.maturity).floor() as usize
    }

    /// Step size in years, `1 / steps_per_year`.
    #[inline]
    pub fn dt(&self) -> f64 {
        1.0 / self.steps_per_year as f64
    }

    /// Time grid shared by every path, `linspace(0, T, N + 1)`.
    pub fn times(&self) -> Vec<f64> {
        linspace(0.0, self.maturity, self.n_steps() + 1)
    }

    /// Precomputed `(drift·dt, σ·√dt)`.
    #[inline]
    fn step_coefficients(&self) -> (f64, f64) {
        let dt = self.dt();
        (
            (self.rate - 0.5 * self.volatility * self.volatility) * dt,
            self.volatility * dt.sqrt(),
        )
    }
}

/// A single simulated price path.
#[derive(Clone, Debug, PartialEq)]
pub struct GbmPath {
    /// Prices, `N + 1` values starting at S₀.
    pub prices: Vec<f64>,
    /// Times in years, `N + 1` values from 0 to T.
    pub times: Vec<f64>,
}

impl GbmPath {
    /// Final price of the path.
    #[inline]
    pub fn terminal(&self) -> f64 {
        self.prices.last().copied().unwrap_or(f64::NAN)
    }
}

/// A batch of simulated paths on a shared time grid.
///
/// Stored row-major: `values[path_idx * (n_steps + 1) + step_idx]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedPaths {
    n_paths: usize,
    n_steps: usize,
    values: Vec<f64>,
    times: Vec<f64>,
}

impl SimulatedPaths {
    /// Number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of steps per path (each path has `n_steps + 1` points).
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Shared time grid.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Raw row-major storage.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Prices of path `index`, or `None` if out of range.
    pub fn path(&self, index: usize) -> Option<&[f64]> {
        let width = self.n_steps + 1;
        self.values.get(index * width..(index + 1) * width)
    }

    /// Iterator over paths.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.n_steps + 1)
    }

    /// Final price of every path.
    pub fn terminal_prices(&self) -> Vec<f64> {
        self.iter().map(|path| path[self.n_steps]).collect()
    }
}

/// Simulates one GBM price path.
///
/// # Errors
///
/// `SimulationError` if [`GbmParams::validate`] fails.
///
/// # Examples
///
/// ```rust
/// use options_mc::paths::{gbm_stock_path, GbmParams};
/// use options_mc::rng::McRng;
///
/// let params = GbmParams::new(100.0, 0.05, 0.2, 1.0);
/// let path = gbm_stock_path(&params, &mut McRng::from_seed(1)).unwrap();
///
/// assert_eq!(path.prices.len(), 253);
/// assert_eq!(path.prices[0], 100.0);
/// assert_eq!(path.times[252], 1.0);
/// ```
pub fn gbm_stock_path(params: &GbmParams, rng: &mut McRng) -> Result<GbmPath, SimulationError> {
    params.validate()?;

    let n_steps = params.n_steps();
    let mut prices = vec![0.0; n_steps + 1];
    evolve_path(params, rng, &mut prices);

    Ok(GbmPath {
        prices,
        times: params.times(),
    })
}

/// Simulates `n_paths` GBM paths.
///
/// Allocates `n_paths × (N + 1)` values; prefer [`gbm_terminal_prices`]
/// when only terminal prices are needed.
///
/// # Errors
///
/// `SimulationError` if the parameters are invalid or `n_paths` is outside
/// [1, `MAX_PATHS`].
pub fn gbm_paths(
    params: &GbmParams,
    n_paths: usize,
    rng: &mut McRng,
) -> Result<SimulatedPaths, SimulationError> {
    params.validate()?;
    check_path_count(n_paths)?;

    let n_steps = params.n_steps();
    let len = n_paths
        .checked_mul(n_steps + 1)
        .ok_or(SimulationError::InvalidParameter {
            name: "n_paths",
            value: n_paths as f64,
        })?;
    let mut values = vec![0.0; len];
    for path in values.chunks_exact_mut(n_steps + 1) {
        evolve_path(params, rng, path);
    }

    tracing::debug!(n_paths, n_steps, "Simulated GBM paths");

    Ok(SimulatedPaths {
        n_paths,
        n_steps,
        values,
        times: params.times(),
    })
}

/// Simulates `n_paths` GBM paths, keeping only each terminal price.
///
/// Consumes the random stream exactly as [`gbm_paths`] does, so the same
/// seed yields the same terminal prices in `O(n_paths)` memory.
///
/// # Errors
///
/// Same as [`gbm_paths`].
///
/// # Examples
///
/// ```rust
/// use options_mc::paths::{gbm_paths, gbm_terminal_prices, GbmParams};
/// use options_mc::rng::McRng;
///
/// let params = GbmParams::new(50.0, 0.03, 0.4, 0.25);
/// let full = gbm_paths(&params, 100, &mut McRng::from_seed(9)).unwrap();
/// let terminals = gbm_terminal_prices(&params, 100, &mut McRng::from_seed(9)).unwrap();
///
/// assert_eq!(full.terminal_prices(), terminals);
/// ```
pub fn gbm_terminal_prices(
    params: &GbmParams,
    n_paths: usize,
    rng: &mut McRng,
) -> Result<Vec<f64>, SimulationError> {
    params.validate()?;
    check_path_count(n_paths)?;

    let n_steps = params.n_steps();
    let (drift_dt, vol_sqrt_dt) = params.step_coefficients();

    let terminals = (0..n_paths)
        .map(|_| {
            let mut log_price = 0.0;
            for _ in 0..n_steps {
                log_price += drift_dt + vol_sqrt_dt * rng.gen_normal();
            }
            params.spot * f64::exp(log_price)
        })
        .collect();

    tracing::debug!(n_paths, n_steps, "Simulated GBM terminal prices");
    Ok(terminals)
}

/// Fills `out` (length `N + 1`) with one path.
#[inline]
fn evolve_path(params: &GbmParams, rng: &mut McRng, out: &mut [f64]) {
    let (drift_dt, vol_sqrt_dt) = params.step_coefficients();

    out[0] = params.spot;
    let mut log_price = 0.0;
    for price in out.iter_mut().skip(1) {
        log_price += drift_dt + vol_sqrt_dt * rng.gen_normal();
        *price = params.spot * f64::exp(log_price);
    }
}

fn check_path_count(n_paths: usize) -> Result<(), SimulationError> {
    if n_paths == 0 || n_paths > MAX_PATHS {
        return Err(ConfigError::InvalidPathCount(n_paths).into());
    }
    Ok(())
}
