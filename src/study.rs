//! Chain-length study for a single match
//!
//! Runs the same match with several chain lengths so the fitted posterior and
//! the sampling cost can be compared against each other and against the prior.

use crate::config::GibbsConfig;
use crate::error::Result;
use crate::rating::gibbs::{ChainParams, GibbsEngine};
use crate::report::ChainReport;
use crate::types::{Outcome, SkillPriors};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The match being studied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SingleMatch {
    pub priors: SkillPriors,
    pub outcome: Outcome,
    pub perf_diff_init: f64,
}

impl SingleMatch {
    /// Two fresh teams, team A wins, chain seeded at 3
    pub fn from_config(config: &GibbsConfig) -> Self {
        let belief = config.initial_belief();
        Self {
            priors: SkillPriors::from_beliefs(&belief, &belief),
            outcome: Outcome::TeamAWin,
            perf_diff_init: 3.0,
        }
    }
}

/// Run `setup` once per chain length, sharing burn-in, noise and seed
pub fn chain_length_study(
    config: &GibbsConfig,
    setup: &SingleMatch,
    chain_lengths: &[usize],
    keep_samples: bool,
) -> Result<Vec<ChainReport>> {
    let mut rng = config.rng();

    chain_lengths
        .iter()
        .map(|&chain_length| {
            let engine = GibbsEngine::new(ChainParams {
                chain_length,
                ..ChainParams::from(config)
            })?;
            let run = engine.run_chain(
                &setup.priors,
                setup.outcome,
                setup.perf_diff_init,
                &mut rng,
            )?;
            let report = ChainReport::from_run(setup.priors, run, keep_samples)?;

            info!(
                "K={} (retained {}): skill_a {:.3}±{:.3}, skill_b {:.3}±{:.3}, time {:.4}s",
                chain_length,
                chain_length - report.burn_in,
                report.summary.mean_a,
                report.summary.std_a,
                report.summary.mean_b,
                report.summary.std_b,
                report.elapsed_secs
            );
            Ok(report)
        })
        .collect()
}
