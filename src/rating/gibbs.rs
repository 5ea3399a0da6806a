//! Gibbs engine for a single two-team match
//!
//! Alternates the two conditional samplers for a fixed number of iterations,
//! keeps the full chain for inspection, and reduces the retained part of the
//! chain to a moment-matched Gaussian summary. The summary is what the rating
//! tracker carries forward as the prior for each team's next match.

use crate::config::GibbsConfig;
use crate::error::{RatingError, Result};
use crate::rating::conditional::{sample_perf_diff_given_skills, sample_skills_given_perf_diff};
use crate::types::{Outcome, PosteriorSummary, SkillPriors};
use crate::utils::{mean, population_std_dev};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::trace;

/// How often chain progress is reported at trace level
const PROGRESS_INTERVAL: usize = 1000;

/// Fixed parameters of one chain run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainParams {
    /// Number of iterations (K)
    pub chain_length: usize,
    /// Iterations excluded from the summary
    pub burn_in: usize,
    /// Standard deviation of the performance-difference noise (st)
    pub performance_noise: f64,
}

impl ChainParams {
    pub fn validate(&self) -> Result<()> {
        if self.chain_length == 0 {
            return Err(RatingError::invalid_parameter("chain length must be positive"));
        }
        if self.burn_in >= self.chain_length {
            return Err(RatingError::invalid_parameter(format!(
                "burn-in ({}) must be smaller than chain length ({})",
                self.burn_in, self.chain_length
            )));
        }
        if !(self.performance_noise.is_finite() && self.performance_noise > 0.0) {
            return Err(RatingError::invalid_parameter(format!(
                "performance noise must be positive, got {}",
                self.performance_noise
            )));
        }
        Ok(())
    }
}

impl From<&GibbsConfig> for ChainParams {
    fn from(config: &GibbsConfig) -> Self {
        Self {
            chain_length: config.chain_length,
            burn_in: config.burn_in,
            performance_noise: config.performance_noise,
        }
    }
}

/// Samples produced by one chain run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GibbsChain {
    pub skill_a: Vec<f64>,
    pub skill_b: Vec<f64>,
    pub perf_diff: Vec<f64>,
    pub burn_in: usize,
}

impl GibbsChain {
    fn with_capacity(chain_length: usize, burn_in: usize) -> Self {
        Self {
            skill_a: Vec::with_capacity(chain_length),
            skill_b: Vec::with_capacity(chain_length),
            perf_diff: Vec::with_capacity(chain_length),
            burn_in,
        }
    }

    /// Number of iterations recorded
    pub fn len(&self) -> usize {
        self.skill_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skill_a.is_empty()
    }

    /// Samples of team A's skill after burn-in
    pub fn retained_skill_a(&self) -> &[f64] {
        self.skill_a.get(self.burn_in..).unwrap_or(&[])
    }

    /// Samples of team B's skill after burn-in
    pub fn retained_skill_b(&self) -> &[f64] {
        self.skill_b.get(self.burn_in..).unwrap_or(&[])
    }
}

/// Result of a chain run: the samples plus post-burn-in wall-clock time
#[derive(Debug, Clone, PartialEq)]
pub struct ChainRun {
    pub chain: GibbsChain,
    pub elapsed: Duration,
}

impl ChainRun {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Drives the two conditional samplers over one match
#[derive(Debug, Clone, Copy)]
pub struct GibbsEngine {
    params: ChainParams,
}

impl GibbsEngine {
    /// Create a new engine, rejecting invalid chain parameters up front
    pub fn new(params: ChainParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    /// Run exactly `chain_length` iterations for one match.
    ///
    /// Iteration `k` draws the skills given the previous performance difference
    /// (`perf_diff_init` when `k == 0`) and then a new performance difference
    /// given those skills and the outcome. Timing covers iterations
    /// `burn_in..chain_length`.
    pub fn run_chain<R: Rng + ?Sized>(
        &self,
        priors: &SkillPriors,
        outcome: Outcome,
        perf_diff_init: f64,
        rng: &mut R,
    ) -> Result<ChainRun> {
        let ChainParams {
            chain_length,
            burn_in,
            performance_noise,
        } = self.params;

        if outcome == Outcome::Draw {
            return Err(RatingError::invalid_parameter(
                "a drawn match carries no outcome sign to condition on",
            ));
        }
        if !perf_diff_init.is_finite() {
            return Err(RatingError::invalid_parameter(format!(
                "initial performance difference must be finite, got {}",
                perf_diff_init
            )));
        }

        let mut chain = GibbsChain::with_capacity(chain_length, burn_in);
        let mut timer: Option<Instant> = None;

        for k in 0..chain_length {
            if k == burn_in {
                timer = Some(Instant::now());
            }
            if k % PROGRESS_INTERVAL == 0 {
                trace!("Gibbs iteration {} / {}", k, chain_length);
            }

            let previous = if k == 0 {
                perf_diff_init
            } else {
                chain.perf_diff[k - 1]
            };

            let (skill_a, skill_b) =
                sample_skills_given_perf_diff(priors, performance_noise, previous, rng)?;
            let perf_diff =
                sample_perf_diff_given_skills(skill_a, skill_b, performance_noise, outcome, rng)?;

            chain.skill_a.push(skill_a);
            chain.skill_b.push(skill_b);
            chain.perf_diff.push(perf_diff);
        }

        let elapsed = timer.map(|start| start.elapsed()).unwrap_or_default();

        Ok(ChainRun { chain, elapsed })
    }
}

/// Reduce the retained part of a chain to means and population standard deviations.
///
/// Fewer than two retained samples, or a zero spread, would freeze a team's
/// rating forever and is rejected.
pub fn summarize(chain: &GibbsChain) -> Result<PosteriorSummary> {
    let retained_a = chain.retained_skill_a();
    let retained_b = chain.retained_skill_b();

    if retained_a.len() < 2 || retained_b.len() < 2 {
        return Err(RatingError::degenerate_sample(format!(
            "need at least 2 samples after burn-in, have {}",
            retained_a.len().min(retained_b.len())
        )));
    }

    let (mean_a, std_a) = moments(retained_a, "skill_a")?;
    let (mean_b, std_b) = moments(retained_b, "skill_b")?;

    Ok(PosteriorSummary {
        mean_a,
        std_a,
        mean_b,
        std_b,
    })
}

fn moments(samples: &[f64], name: &str) -> Result<(f64, f64)> {
    let (Some(mean), Some(std)) = (mean(samples), population_std_dev(samples)) else {
        return Err(RatingError::degenerate_sample(format!("no samples of {}", name)));
    };

    if !mean.is_finite() || !std.is_finite() || std <= 0.0 {
        return Err(RatingError::degenerate_sample(format!(
            "{} has mean {} and standard deviation {}",
            name, mean, std
        )));
    }

    Ok((mean, std))
}
