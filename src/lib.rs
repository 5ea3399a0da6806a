//! Gibbs Rating - Bayesian skill ratings for two-team matches
//!
//! This crate estimates latent team skills from chronological match results
//! with a Gibbs sampler over two Gaussian skills and a truncated performance
//! difference, carrying moment-matched posteriors forward from match to match.

pub mod config;
pub mod data;
pub mod error;
pub mod rating;
pub mod report;
pub mod study;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use rating::{GibbsEngine, GibbsRatingCalculator, RatingCalculator, RatingTracker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
