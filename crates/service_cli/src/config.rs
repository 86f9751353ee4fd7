//! Application configuration management
//!
//! Settings come from, lowest to highest priority:
//! 1. Built-in defaults
//! 2. A TOML file (`quant-options.toml` or `--config`)
//! 3. `QUANT_OPTIONS_*` environment variables
//! 4. Command-line flags

use std::path::{Path, PathBuf};
use std::str::FromStr;

use options_core::math::solvers::SolverConfig;
use options_mc::config::{MAX_PATHS, MAX_STEPS_PER_YEAR};
use options_mc::PnlConvention;
use options_models::implied_vol::ImpliedVolConfig;
use serde::Deserialize;
use thiserror::Error;

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "quant-options.toml";

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "QUANT_OPTIONS_";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Unknown log level name.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// A setting is out of range or unparsable.
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// Setting name.
        key: String,
        /// Offending value.
        value: String,
    },

    /// Config file could not be read or parsed.
    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Solver fallbacks and per-step detail.
    Debug,
    /// Progress messages.
    Info,
    /// Warnings only.
    #[default]
    Warn,
    /// Errors only.
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Implied volatility solver settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverSettings {
    /// Newton starting volatility.
    pub sigma_init: f64,
    /// Newton tolerance.
    pub newton_tolerance: f64,
    /// Newton iteration cap.
    pub newton_max_iterations: usize,
    /// Brent tolerance.
    pub brent_tolerance: f64,
    /// Brent iteration cap.
    pub brent_max_iterations: usize,
    /// Lower end of the Brent bracket.
    pub bracket_lower: f64,
    /// Upper end of the Brent bracket.
    pub bracket_upper: f64,
    /// Volatility used when both solvers fail.
    pub floor: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        let iv = ImpliedVolConfig::default();
        Self {
            sigma_init: iv.sigma_init,
            newton_tolerance: iv.newton.tolerance,
            newton_max_iterations: iv.newton.max_iterations,
            brent_tolerance: iv.brent.tolerance,
            brent_max_iterations: iv.brent.max_iterations,
            bracket_lower: iv.bracket_lower,
            bracket_upper: iv.bracket_upper,
            floor: iv.floor,
        }
    }
}

impl SolverSettings {
    /// Builds the implied volatility configuration.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidValue` on a non-positive tolerance or iteration
    /// cap, or a volatility setting the solver rejects.
    pub fn to_iv_config(&self) -> Result<ImpliedVolConfig, ConfigError> {
        let checks = [
            ("solver.newton_tolerance", self.newton_tolerance),
            ("solver.brent_tolerance", self.brent_tolerance),
        ];
        for (key, value) in checks {
            if !(value > 0.0 && value.is_finite()) {
                return Err(invalid(key, value));
            }
        }
        if self.newton_max_iterations == 0 {
            return Err(invalid("solver.newton_max_iterations", 0));
        }
        if self.brent_max_iterations == 0 {
            return Err(invalid("solver.brent_max_iterations", 0));
        }

        let config = ImpliedVolConfig::default()
            .with_sigma_init(self.sigma_init)
            .with_newton(SolverConfig::new(self.newton_tolerance, self.newton_max_iterations))
            .with_brent(SolverConfig::new(self.brent_tolerance, self.brent_max_iterations))
            .with_bracket(self.bracket_lower, self.bracket_upper)
            .with_floor(self.floor);

        config
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: "solver".to_string(),
                value: e.to_string(),
            })?;
        Ok(config)
    }
}

/// Chart export settings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartSettings {
    /// Histogram bins for terminal prices.
    pub histogram_bins: usize,
    /// Points on the fitted lognormal density curve.
    pub density_points: usize,
    /// Points on the payoff curves.
    pub payoff_points: usize,
    /// Most points per series in JSON charts; CSV files keep every point.
    pub max_points: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            histogram_bins: 50,
            density_points: 300,
            payoff_points: 400,
            max_points: 2_000,
        }
    }
}

/// Application configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Risk-free rate.
    pub rate: f64,
    /// Monte Carlo paths.
    pub sims: usize,
    /// Simulation steps per year.
    pub steps_per_year: usize,
    /// Quotes closest to the money used for implied volatility.
    pub num_options: usize,
    /// Seed for reproducible simulations.
    pub seed: Option<u64>,
    /// Directory charts are written to.
    pub output_dir: PathBuf,
    /// PnL convention for the Monte Carlo summary.
    #[serde(deserialize_with = "deserialize_convention")]
    pub convention: PnlConvention,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Implied volatility solver settings.
    pub solver: SolverSettings,
    /// Chart export settings.
    pub charts: ChartSettings,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_convention<'de, D>(deserializer: D) -> Result<PnlConvention, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    PnlConvention::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rate: 0.04,
            sims: 100_000,
            steps_per_year: 252,
            num_options: 5,
            seed: None,
            output_dir: PathBuf::from("output"),
            convention: PnlConvention::PresentValue,
            log_level: LogLevel::Warn,
            solver: SolverSettings::default(),
            charts: ChartSettings::default(),
        }
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Applies `QUANT_OPTIONS_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides using `lookup` to resolve variable names.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{}{}", ENV_PREFIX, name);
            lookup(&key).map(|value| (key, value))
        };

        if let Some((key, value)) = var("RATE") {
            self.rate = parse_env(&key, &value)?;
        }
        if let Some((key, value)) = var("SIMS") {
            self.sims = parse_env(&key, &value)?;
        }
        if let Some((key, value)) = var("STEPS_PER_YEAR") {
            self.steps_per_year = parse_env(&key, &value)?;
        }
        if let Some((key, value)) = var("NUM_OPTIONS") {
            self.num_options = parse_env(&key, &value)?;
        }
        if let Some((key, value)) = var("SEED") {
            self.seed = Some(parse_env(&key, &value)?);
        }
        if let Some((_, value)) = var("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(value);
        }
        if let Some((key, value)) = var("CONVENTION") {
            self.convention = PnlConvention::from_str(&value).map_err(|_| invalid(&key, &value))?;
        }
        if let Some((_, value)) = var("LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&value)?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) {
        if let Some(rate) = cli.rate {
            self.rate = rate;
        }
        if let Some(sims) = cli.sims {
            self.sims = sims;
        }
        if let Some(steps) = cli.steps_per_year {
            self.steps_per_year = steps;
        }
        if let Some(n) = cli.num_options {
            self.num_options = n;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(convention) = cli.convention {
            self.convention = convention;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rate.is_finite() {
            return Err(invalid("rate", self.rate));
        }
        if self.sims == 0 || self.sims > MAX_PATHS {
            return Err(invalid("sims", self.sims));
        }
        if self.steps_per_year == 0 || self.steps_per_year > MAX_STEPS_PER_YEAR {
            return Err(invalid("steps_per_year", self.steps_per_year));
        }
        if self.num_options == 0 {
            return Err(invalid("num_options", self.num_options));
        }
        if self.charts.histogram_bins == 0 {
            return Err(invalid("charts.histogram_bins", 0));
        }
        for (key, points) in [
            ("charts.density_points", self.charts.density_points),
            ("charts.payoff_points", self.charts.payoff_points),
            ("charts.max_points", self.charts.max_points),
        ] {
            if points < 2 {
                return Err(invalid(key, points));
            }
        }
        self.solver.to_iv_config()?;
        Ok(())
    }
}

/// Overrides taken from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Risk-free rate override
    pub rate: Option<f64>,
    /// Path count override
    pub sims: Option<usize>,
    /// Steps-per-year override
    pub steps_per_year: Option<usize>,
    /// Quote count override
    pub num_options: Option<usize>,
    /// Seed override
    pub seed: Option<u64>,
    /// Output directory override
    pub output_dir: Option<PathBuf>,
    /// PnL convention override
    pub convention: Option<PnlConvention>,
    /// Log level override
    pub log_level: Option<LogLevel>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliOverrides) -> Result<AppConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) => AppConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            AppConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => AppConfig::default(),
    };

    config.apply_env()?;
    config.merge_with_cli(cli);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.rate, 0.04);
        assert_eq!(config.sims, 100_000);
        assert_eq!(config.steps_per_year, 252);
        assert_eq!(config.num_options, 5);
        assert_eq!(config.seed, None);
        assert_eq!(config.convention, PnlConvention::PresentValue);
        assert_eq!(config.charts.histogram_bins, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml_str(
            r#"
            rate = 0.05
            seed = 7
            convention = "opportunity-cost"
            log_level = "debug"

            [solver]
            sigma_init = 0.3

            [charts]
            histogram_bins = 80
            "#,
        )
        .unwrap();

        assert_eq!(config.rate, 0.05);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.sims, 100_000);
        assert_eq!(config.convention, PnlConvention::OpportunityCost);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.solver.sigma_init, 0.3);
        assert_eq!(config.solver.bracket_upper, 5.0);
        assert_eq!(config.charts.histogram_bins, 80);
        assert_eq!(config.charts.payoff_points, 400);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::from_toml_str("log_level = \"loud\""),
            Err(ConfigError::FileError(_))
        ));
        assert!(AppConfig::from_toml_str("rate = [").is_err());
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quant-options.toml");
        std::fs::write(&path, "sims = 5000\noutput_dir = \"charts\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.sims, 5000);
        assert_eq!(config.output_dir, PathBuf::from("charts"));

        assert!(AppConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env_from(env(&[
                ("QUANT_OPTIONS_RATE", "0.03"),
                ("QUANT_OPTIONS_SIMS", "2500"),
                ("QUANT_OPTIONS_SEED", "11"),
                ("QUANT_OPTIONS_CONVENTION", "expiry"),
                ("QUANT_OPTIONS_LOG_LEVEL", "info"),
                ("QUANT_OPTIONS_OUTPUT_DIR", "/tmp/charts"),
            ]))
            .unwrap();

        assert_eq!(config.rate, 0.03);
        assert_eq!(config.sims, 2500);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.convention, PnlConvention::Expiry);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/charts"));
        assert_eq!(config.steps_per_year, 252);
    }

    #[test]
    fn test_env_parse_error_names_variable() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_from(env(&[("QUANT_OPTIONS_SIMS", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("QUANT_OPTIONS_SIMS"));
    }

    #[test]
    fn test_cli_takes_precedence() {
        let mut config = AppConfig::default();
        config
            .apply_env_from(env(&[("QUANT_OPTIONS_RATE", "0.03")]))
            .unwrap();
        config.merge_with_cli(&CliOverrides {
            rate: Some(0.06),
            seed: Some(1),
            ..Default::default()
        });

        assert_eq!(config.rate, 0.06);
        assert_eq!(config.seed, Some(1));
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = AppConfig::default();
        config.sims = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.num_options = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.rate = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.charts.payoff_points = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_solver_settings() {
        let settings = SolverSettings::default();
        assert_eq!(settings.to_iv_config().unwrap(), ImpliedVolConfig::default());

        let bad = SolverSettings {
            newton_tolerance: 0.0,
            ..Default::default()
        };
        assert!(bad.to_iv_config().is_err());

        let inverted = SolverSettings {
            bracket_lower: 2.0,
            bracket_upper: 1.0,
            ..Default::default()
        };
        assert!(inverted.to_iv_config().is_err());
    }
}
