//! Rating calculator trait and the Gibbs-sampled implementation
//!
//! This module defines the interface the tracker uses to turn one match into
//! two updated beliefs, and the calculator that does so by running a Gibbs
//! chain with the two current beliefs as priors.

use crate::config::GibbsConfig;
use crate::error::Result;
use crate::rating::gibbs::{summarize, ChainParams, GibbsEngine};
use crate::types::{MatchObservation, PosteriorSummary, SkillBelief, SkillPriors};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Result of processing one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchUpdate {
    pub belief_a: SkillBelief,
    pub belief_b: SkillBelief,
    /// Present only when a chain was run, i.e. the match was not a draw
    pub posterior: Option<PosteriorSummary>,
    /// Sampling time after burn-in; zero for draws
    pub elapsed: Duration,
}

impl MatchUpdate {
    /// Update that carries both beliefs forward unchanged
    pub fn unchanged(belief_a: SkillBelief, belief_b: SkillBelief) -> Self {
        Self {
            belief_a,
            belief_b,
            posterior: None,
            elapsed: Duration::ZERO,
        }
    }
}

/// Trait for turning a match outcome into updated skill beliefs
pub trait RatingCalculator {
    /// Compute the new beliefs of both teams after a match.
    ///
    /// Implementations must not touch any team table; the caller commits the
    /// returned beliefs.
    fn process_match(
        &mut self,
        belief_a: &SkillBelief,
        belief_b: &SkillBelief,
        observation: &MatchObservation,
    ) -> Result<MatchUpdate>;

    /// Belief given to a team before its first match
    fn initial_belief(&self) -> SkillBelief;
}

/// Calculator backed by the Gibbs engine
#[derive(Debug)]
pub struct GibbsRatingCalculator {
    engine: GibbsEngine,
    initial_belief: SkillBelief,
    rng: StdRng,
}

impl GibbsRatingCalculator {
    /// Create a calculator from validated configuration.
    ///
    /// A configured seed makes the whole run reproducible; otherwise the RNG is
    /// seeded from the operating system.
    pub fn new(config: &GibbsConfig) -> Result<Self> {
        // Chain parameters fail as `InvalidParameter`, same as the engine
        let engine = GibbsEngine::new(ChainParams::from(config))?;
        config.validate()?;

        Ok(Self {
            engine,
            initial_belief: config.initial_belief(),
            rng: config.rng(),
        })
    }

    pub fn engine(&self) -> &GibbsEngine {
        &self.engine
    }
}

impl RatingCalculator for GibbsRatingCalculator {
    fn process_match(
        &mut self,
        belief_a: &SkillBelief,
        belief_b: &SkillBelief,
        observation: &MatchObservation,
    ) -> Result<MatchUpdate> {
        if observation.is_draw() {
            debug!(
                "Draw between {} and {}, beliefs carried forward",
                observation.team_a, observation.team_b
            );
            return Ok(MatchUpdate::unchanged(*belief_a, *belief_b));
        }

        let priors = SkillPriors::from_beliefs(belief_a, belief_b);
        // The chain starts from the literal score differential, not just its sign
        let perf_diff_init = observation.score_diff as f64;

        let run = self
            .engine
            .run_chain(&priors, observation.outcome, perf_diff_init, &mut self.rng)?;
        let summary = summarize(&run.chain)?;

        debug!(
            "{} vs {} ({}): {:.3}±{:.3} -> {:.3}±{:.3}, {:.3}±{:.3} -> {:.3}±{:.3}",
            observation.team_a,
            observation.team_b,
            observation.outcome,
            belief_a.mean,
            belief_a.stddev,
            summary.mean_a,
            summary.std_a,
            belief_b.mean,
            belief_b.stddev,
            summary.mean_b,
            summary.std_b
        );

        Ok(MatchUpdate {
            belief_a: summary.belief_a(),
            belief_b: summary.belief_b(),
            posterior: Some(summary),
            elapsed: run.elapsed,
        })
    }

    fn initial_belief(&self) -> SkillBelief {
        self.initial_belief
    }
}
