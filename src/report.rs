//! Serializable reports for downstream consumers
//!
//! Plotting and presentation live outside this crate. These types package
//! the numbers a presentation layer needs: per-team trajectories, final
//! standings, and per-chain samples with timing.

use crate::error::Result;
use crate::rating::gibbs::{summarize, ChainRun, GibbsChain};
use crate::rating::tracker::SequenceStats;
use crate::types::{PosteriorSummary, SkillBelief, SkillPriors, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One team's belief trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTrajectory {
    pub team: TeamId,
    pub history: Vec<SkillBelief>,
}

impl TeamTrajectory {
    pub fn final_belief(&self) -> Option<SkillBelief> {
        self.history.last().copied()
    }
}

/// Final position of a team, ordered by posterior mean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: usize,
    pub team: TeamId,
    pub belief: SkillBelief,
    pub matches_played: usize,
}

/// Everything produced by rating a match sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceReport {
    pub generated_at: DateTime<Utc>,
    pub stats: SequenceStats,
    pub standings: Vec<Standing>,
    pub trajectories: Vec<TeamTrajectory>,
}

impl SequenceReport {
    pub fn new(histories: BTreeMap<TeamId, Vec<SkillBelief>>, stats: SequenceStats) -> Self {
        let trajectories: Vec<TeamTrajectory> = histories
            .into_iter()
            .map(|(team, history)| TeamTrajectory { team, history })
            .collect();

        let mut standings: Vec<Standing> = trajectories
            .iter()
            .filter_map(|trajectory| {
                trajectory.final_belief().map(|belief| Standing {
                    rank: 0,
                    team: trajectory.team.clone(),
                    belief,
                    matches_played: trajectory.history.len().saturating_sub(1),
                })
            })
            .collect();

        // Sort by mean (descending), ties broken by name for stable output
        standings.sort_by(|a, b| {
            b.belief
                .mean
                .partial_cmp(&a.belief.mean)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.team.cmp(&b.team))
        });
        for (index, standing) in standings.iter_mut().enumerate() {
            standing.rank = index + 1;
        }

        Self {
            generated_at: crate::utils::current_timestamp(),
            stats,
            standings,
            trajectories,
        }
    }

    pub fn trajectory(&self, team: &str) -> Option<&TeamTrajectory> {
        self.trajectories.iter().find(|t| t.team == team)
    }
}

/// Outcome of one chain run, as consumed by histogram and density plots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainReport {
    pub prior: SkillPriors,
    pub summary: PosteriorSummary,
    pub chain_length: usize,
    pub burn_in: usize,
    pub elapsed_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<GibbsChain>,
}

impl ChainReport {
    /// Summarize a chain run; raw samples are kept only when asked for
    pub fn from_run(prior: SkillPriors, run: ChainRun, keep_samples: bool) -> Result<Self> {
        let summary = summarize(&run.chain)?;
        let elapsed_secs = run.elapsed_secs();

        Ok(Self {
            prior,
            summary,
            chain_length: run.chain.len(),
            burn_in: run.chain.burn_in,
            elapsed_secs,
            samples: keep_samples.then_some(run.chain),
        })
    }

    /// Shift of each posterior mean relative to its prior
    pub fn mean_shift(&self) -> (f64, f64) {
        (
            self.summary.mean_a - self.prior.mean_a,
            self.summary.mean_b - self.prior.mean_b,
        )
    }
}
