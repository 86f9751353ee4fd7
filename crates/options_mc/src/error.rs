//! Error types for simulation configuration and runtime.

use thiserror::Error;

use crate::config::{MAX_PATHS, MAX_STEPS_PER_YEAR};

/// Configuration error for Monte Carlo simulation.
///
/// Raised when a [`SimulationConfig`](crate::SimulationConfig) is built with
/// out-of-range values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Path count outside [1, `MAX_PATHS`].
    #[error("Invalid path count {0}: must be in range [1, {max}]", max = MAX_PATHS)]
    InvalidPathCount(usize),

    /// Steps per year outside [1, `MAX_STEPS_PER_YEAR`].
    #[error("Invalid steps per year {0}: must be in range [1, {max}]", max = MAX_STEPS_PER_YEAR)]
    InvalidStepsPerYear(usize),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

/// Runtime simulation errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    /// A model parameter is out of range.
    #[error("Invalid {name}: {value} (must be positive and finite)")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Offending value
        value: f64,
    },

    /// An operation that needs data received none.
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    /// A statistics routine received a value outside its domain.
    #[error("Invalid sample for {context}: {value}")]
    InvalidSample {
        /// What was being computed
        context: &'static str,
        /// Offending value
        value: f64,
    },

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidPathCount(0);
        assert_eq!(
            err.to_string(),
            "Invalid path count 0: must be in range [1, 10000000]"
        );

        let err = ConfigError::InvalidStepsPerYear(20_000);
        assert!(err.to_string().contains("Invalid steps per year 20000"));

        let err = ConfigError::InvalidParameter {
            name: "n_paths",
            value: "must be specified".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid parameter 'n_paths': must be specified");
    }

    #[test]
    fn test_simulation_error_display() {
        let err = SimulationError::InvalidParameter {
            name: "volatility",
            value: -0.1,
        };
        assert_eq!(
            err.to_string(),
            "Invalid volatility: -0.1 (must be positive and finite)"
        );
        assert_eq!(
            SimulationError::EmptyInput("price path").to_string(),
            "Empty input: price path"
        );
    }

    #[test]
    fn test_config_error_converts() {
        let err: SimulationError = ConfigError::InvalidPathCount(0).into();
        assert!(matches!(err, SimulationError::Config(ConfigError::InvalidPathCount(0))));
        assert!(err.to_string().contains("path count"));
    }
}
