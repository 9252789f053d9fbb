//! Annealing configuration and cooling schedules.

use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cooling schedule for temperature reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoolingSchedule {
    /// `T_{k+1} = alpha * T_k`, alpha in (0, 1).
    Geometric { alpha: f64 },

    /// `T_{k+1} = T_k / (1 + beta * T_k)`, one move per temperature.
    LundyMees { beta: f64 },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.95 }
    }
}

/// Configuration for the annealing warm start.
///
/// Temperatures are in score units: at temperature `T` a move losing `d`
/// points is accepted with probability `exp(-d / T)`.
///
/// # Examples
///
/// ```
/// use u_casting::anneal::{AnnealConfig, CoolingSchedule};
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(20.0)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.9 })
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnealConfig {
    /// Initial temperature.
    pub initial_temperature: f64,

    /// The run stops when the temperature drops below this.
    pub min_temperature: f64,

    pub cooling: CoolingSchedule,

    /// Moves per temperature level (ignored by `LundyMees`).
    pub iterations_per_temperature: usize,

    /// Hard move budget. 0 = no limit.
    pub max_iterations: usize,

    /// Random seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 10.0,
            min_temperature: 0.01,
            cooling: CoolingSchedule::default(),
            iterations_per_temperature: 200,
            max_iterations: 100_000,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::InvalidSolverConfig(msg));
        if !(self.initial_temperature > 0.0) {
            return invalid("initial_temperature must be positive".into());
        }
        if !(self.min_temperature > 0.0) {
            return invalid("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.initial_temperature {
            return invalid("min_temperature must be less than initial_temperature".into());
        }
        if self.iterations_per_temperature == 0 {
            return invalid("iterations_per_temperature must be at least 1".into());
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha } if !(alpha > 0.0 && alpha < 1.0) => {
                invalid(format!("geometric alpha must be in (0, 1), got {alpha}"))
            }
            CoolingSchedule::LundyMees { beta } if !(beta > 0.0) => {
                invalid(format!("lundy-mees beta must be positive, got {beta}"))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnnealConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.iterations_per_temperature, 200);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_validate_min_ge_initial() {
        let config = AnnealConfig::default()
            .with_initial_temperature(1.0)
            .with_min_temperature(2.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_nan_temperature() {
        let config = AnnealConfig::default().with_initial_temperature(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_alpha() {
        let config =
            AnnealConfig::default().with_cooling(CoolingSchedule::Geometric { alpha: 1.0 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_beta() {
        let config = AnnealConfig::default().with_cooling(CoolingSchedule::LundyMees { beta: 0.0 });
        assert!(config.validate().is_err());
    }
}
