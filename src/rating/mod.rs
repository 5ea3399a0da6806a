//! Gibbs-sampled two-team skill rating
//!
//! This module provides the conditional samplers, the per-match Gibbs engine,
//! and the tracker that threads team beliefs through a match sequence.

pub mod calculator;
pub mod conditional;
pub mod gibbs;
pub mod storage;
pub mod tracker;

// Re-export commonly used types
pub use calculator::{GibbsRatingCalculator, MatchUpdate, RatingCalculator};
pub use conditional::{sample_perf_diff_given_skills, sample_skills_given_perf_diff};
pub use gibbs::{summarize, ChainParams, ChainRun, GibbsChain, GibbsEngine};
pub use storage::{BeliefTable, TeamEntry};
pub use tracker::{run_sequence, RatingTracker, SequenceStats};
