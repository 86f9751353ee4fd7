//! Monte Carlo simulation configuration.

use crate::error::ConfigError;
use crate::rng::McRng;

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 10_000_000;

/// Maximum number of time steps per simulated year.
pub const MAX_STEPS_PER_YEAR: usize = 10_000;

/// Maximum number of time steps in one simulated path.
pub const MAX_STEPS: usize = 1_000_000;

/// Default number of time steps per year (trading days).
pub const DEFAULT_STEPS_PER_YEAR: usize = 252;

/// Monte Carlo simulation configuration.
///
/// Immutable once built. Use [`SimulationConfig::builder`].
///
/// # Examples
///
/// ```rust
/// use options_mc::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .n_paths(100_000)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 100_000);
/// assert_eq!(config.steps_per_year(), 252);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    n_paths: usize,
    steps_per_year: usize,
    seed: Option<u64>,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the number of time steps per year.
    #[inline]
    pub fn steps_per_year(&self) -> usize {
        self.steps_per_year
    }

    /// Returns the optional seed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Creates the generator for this run: seeded if a seed was set,
    /// entropy-seeded otherwise.
    pub fn rng(&self) -> McRng {
        McRng::from_optional_seed(self.seed)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `n_paths` is 0 or greater than [`MAX_PATHS`]
    /// - `steps_per_year` is 0 or greater than [`MAX_STEPS_PER_YEAR`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths == 0 || self.n_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(self.n_paths));
        }
        if self.steps_per_year == 0 || self.steps_per_year > MAX_STEPS_PER_YEAR {
            return Err(ConfigError::InvalidStepsPerYear(self.steps_per_year));
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    n_paths: Option<usize>,
    steps_per_year: Option<usize>,
    seed: Option<u64>,
}

impl SimulationConfigBuilder {
    /// Sets the number of simulation paths, in [1, 10_000_000].
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the number of steps per year, in [1, 10_000]. Defaults to 252.
    #[inline]
    pub fn steps_per_year(mut self, steps_per_year: usize) -> Self {
        self.steps_per_year = Some(steps_per_year);
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the seed.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `n_paths` is not set or any value is out of
    /// range.
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let n_paths = self.n_paths.ok_or(ConfigError::InvalidParameter {
            name: "n_paths",
            value: "must be specified".to_string(),
        })?;

        let config = SimulationConfig {
            n_paths,
            steps_per_year: self.steps_per_year.unwrap_or(DEFAULT_STEPS_PER_YEAR),
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}
