//! Main application configuration
//!
//! This module defines the primary configuration structures for the gibbs-rating
//! driver, including environment variable and TOML file loading and validation.

use crate::config::rating::GibbsConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub sampler: GibbsConfig,
    pub tracker: TrackerSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// What the sequence driver does when a single match fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the whole run on the first failing match
    #[default]
    Abort,
    /// Log a warning, carry both beliefs forward and continue
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(anyhow!("Invalid failure policy: {}", other)),
        }
    }
}

/// Rating tracker settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub failure_policy: FailurePolicy,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "gibbs-rating".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still override it
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Sampler settings
        if let Ok(length) = env::var("GIBBS_CHAIN_LENGTH") {
            self.sampler.chain_length = length
                .parse()
                .map_err(|_| anyhow!("Invalid GIBBS_CHAIN_LENGTH value: {}", length))?;
        }
        if let Ok(burn_in) = env::var("GIBBS_BURN_IN") {
            self.sampler.burn_in = burn_in
                .parse()
                .map_err(|_| anyhow!("Invalid GIBBS_BURN_IN value: {}", burn_in))?;
        }
        if let Ok(noise) = env::var("GIBBS_PERFORMANCE_NOISE") {
            self.sampler.performance_noise = noise
                .parse()
                .map_err(|_| anyhow!("Invalid GIBBS_PERFORMANCE_NOISE value: {}", noise))?;
        }
        if let Ok(mean) = env::var("GIBBS_INITIAL_MEAN") {
            self.sampler.initial_mean = mean
                .parse()
                .map_err(|_| anyhow!("Invalid GIBBS_INITIAL_MEAN value: {}", mean))?;
        }
        if let Ok(stddev) = env::var("GIBBS_INITIAL_STDDEV") {
            self.sampler.initial_stddev = stddev
                .parse()
                .map_err(|_| anyhow!("Invalid GIBBS_INITIAL_STDDEV value: {}", stddev))?;
        }
        if let Ok(seed) = env::var("GIBBS_SEED") {
            self.sampler.seed = Some(
                seed.parse()
                    .map_err(|_| anyhow!("Invalid GIBBS_SEED value: {}", seed))?,
            );
        }

        // Tracker settings
        if let Ok(policy) = env::var("FAILURE_POLICY") {
            self.tracker.failure_policy = policy.parse()?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.sampler.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.tracker.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.service.log_level = "verbose".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_sampler_settings_rejected() {
        let mut config = AppConfig::default();
        config.sampler.burn_in = 500;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_failure_policy_parsing() {
        assert_eq!("abort".parse::<FailurePolicy>().unwrap(), FailurePolicy::Abort);
        assert_eq!("SKIP".parse::<FailurePolicy>().unwrap(), FailurePolicy::Skip);
        assert!("retry".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[service]
log_level = "debug"

[sampler]
chain_length = 400
burn_in = 50
performance_noise = 3.0
seed = 42

[tracker]
failure_policy = "skip"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.service.log_level, "debug");
        assert_eq!(config.service.name, "gibbs-rating");
        assert_eq!(config.sampler.chain_length, 400);
        assert_eq!(config.sampler.burn_in, 50);
        assert_eq!(config.sampler.performance_noise, 3.0);
        assert_eq!(config.sampler.seed, Some(42));
        assert_eq!(config.sampler.initial_mean, 25.0);
        assert_eq!(config.tracker.failure_policy, FailurePolicy::Skip);
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sampler]\nchain_length = 10\nburn_in = 10").unwrap();

        assert!(AppConfig::from_file(file.path()).is_err());
    }
}
