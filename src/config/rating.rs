//! Gibbs sampler configuration

use crate::error::{RatingError, Result};
use crate::types::SkillBelief;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Parameters shared by every chain run and by new-team defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GibbsConfig {
    /// Number of Gibbs iterations per match (K)
    pub chain_length: usize,
    /// Leading iterations excluded from the posterior summary
    pub burn_in: usize,
    /// Standard deviation of the performance-difference noise.
    /// Smaller values make the outcome more telling of the skill gap.
    pub performance_noise: f64,
    /// Prior mean for teams with no history
    pub initial_mean: f64,
    /// Prior standard deviation for teams with no history
    pub initial_stddev: f64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for GibbsConfig {
    fn default() -> Self {
        Self {
            chain_length: 80,
            burn_in: 10,
            performance_noise: 5.0,
            initial_mean: 25.0,
            initial_stddev: 25.0 / 3.0,
            seed: None,
        }
    }
}

impl GibbsConfig {
    /// Long chain for studying a single match
    pub fn single_match() -> Self {
        Self {
            chain_length: 1000,
            ..Self::default()
        }
    }

    /// Shortest chain that still leaves ten retained samples
    pub fn quick() -> Self {
        Self {
            chain_length: 20,
            ..Self::default()
        }
    }

    /// Belief assigned to a team before its first match
    pub fn initial_belief(&self) -> SkillBelief {
        SkillBelief::new(self.initial_mean, self.initial_stddev)
    }

    /// Random source for sampling: seeded when `seed` is set, otherwise from OS entropy
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.chain_length == 0 {
            return Err(RatingError::ConfigurationError {
                message: "Chain length must be positive".to_string(),
            }
            .into());
        }

        if self.burn_in >= self.chain_length {
            return Err(RatingError::ConfigurationError {
                message: format!(
                    "Burn-in ({}) must be smaller than chain length ({})",
                    self.burn_in, self.chain_length
                ),
            }
            .into());
        }

        if self.chain_length - self.burn_in < 2 {
            return Err(RatingError::ConfigurationError {
                message: "At least two samples must remain after burn-in".to_string(),
            }
            .into());
        }

        if !(self.performance_noise.is_finite() && self.performance_noise > 0.0) {
            return Err(RatingError::ConfigurationError {
                message: "Performance noise must be positive".to_string(),
            }
            .into());
        }

        if !self.initial_mean.is_finite() {
            return Err(RatingError::ConfigurationError {
                message: "Initial mean must be finite".to_string(),
            }
            .into());
        }

        if !(self.initial_stddev.is_finite() && self.initial_stddev > 0.0) {
            return Err(RatingError::ConfigurationError {
                message: "Initial standard deviation must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gibbs_config_default() {
        let config = GibbsConfig::default();
        assert_eq!(config.chain_length, 80);
        assert_eq!(config.burn_in, 10);
        assert_eq!(config.performance_noise, 5.0);
        assert_eq!(config.initial_belief(), SkillBelief::new(25.0, 25.0 / 3.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_gibbs_config_validation() {
        let mut config = GibbsConfig::default();

        config.chain_length = 0;
        assert!(config.validate().is_err());

        config = GibbsConfig::default();
        config.burn_in = config.chain_length;
        assert!(config.validate().is_err());

        // One retained sample cannot produce a spread
        config = GibbsConfig::default();
        config.burn_in = config.chain_length - 1;
        assert!(config.validate().is_err());

        config = GibbsConfig::default();
        config.performance_noise = 0.0;
        assert!(config.validate().is_err());

        config = GibbsConfig::default();
        config.initial_stddev = -1.0;
        assert!(config.validate().is_err());

        config = GibbsConfig::default();
        config.initial_mean = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_presets() {
        assert_eq!(GibbsConfig::single_match().chain_length, 1000);
        assert_eq!(GibbsConfig::quick().chain_length, 20);
        assert!(GibbsConfig::single_match().validate().is_ok());
        assert!(GibbsConfig::quick().validate().is_ok());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;

        let config = GibbsConfig {
            seed: Some(99),
            ..GibbsConfig::default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: GibbsConfig = toml::from_str("chain_length = 200\nseed = 7").unwrap();
        assert_eq!(config.chain_length, 200);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.burn_in, 10);
    }
}
