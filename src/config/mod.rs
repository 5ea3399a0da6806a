//! Configuration management for the gibbs-rating driver
//!
//! This module handles all configuration loading from environment variables
//! and TOML files, validation, and default values for the sampler.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, FailurePolicy, ServiceSettings, TrackerSettings};
pub use rating::GibbsConfig;
