//! Common types used throughout the rating engine

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};

/// Unique identifier for teams
pub type TeamId = String;

/// Current belief about a team's latent skill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillBelief {
    pub mean: f64,
    pub stddev: f64,
}

impl SkillBelief {
    pub fn new(mean: f64, stddev: f64) -> Self {
        Self { mean, stddev }
    }
}

impl Default for SkillBelief {
    fn default() -> Self {
        Self {
            mean: 25.0,
            stddev: 25.0 / 3.0,
        }
    }
}

/// Observed result of a match from team A's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    TeamAWin,
    Draw,
    TeamBWin,
}

impl Outcome {
    /// Outcome implied by the sign of `score_a - score_b`
    pub fn from_score_diff(score_diff: i64) -> Self {
        match crate::utils::sign_of(score_diff) {
            1 => Outcome::TeamAWin,
            -1 => Outcome::TeamBWin,
            _ => Outcome::Draw,
        }
    }

    /// Numeric sign of the outcome: +1, 0 or -1
    pub fn sign(self) -> i8 {
        match self {
            Outcome::TeamAWin => 1,
            Outcome::Draw => 0,
            Outcome::TeamBWin => -1,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::TeamAWin => write!(f, "TeamAWin"),
            Outcome::Draw => write!(f, "Draw"),
            Outcome::TeamBWin => write!(f, "TeamBWin"),
        }
    }
}

/// Raw row of the match table, as supplied by the data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub team1: TeamId,
    pub team2: TeamId,
    pub score1: i64,
    pub score2: i64,
}

impl MatchRecord {
    pub fn observation(&self) -> Result<MatchObservation> {
        MatchObservation::from_scores(
            self.team1.clone(),
            self.team2.clone(),
            self.score1,
            self.score2,
        )
    }
}

/// A match reduced to what inference needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchObservation {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub outcome: Outcome,
    /// `score_a - score_b`; seeds the performance-difference chain
    pub score_diff: i64,
}

impl MatchObservation {
    /// Fails when `score_a - score_b` does not fit in an `i64`
    pub fn from_scores(team_a: TeamId, team_b: TeamId, score_a: i64, score_b: i64) -> Result<Self> {
        let score_diff = score_a.checked_sub(score_b).ok_or_else(|| {
            RatingError::invalid_parameter(format!(
                "score differential {} - {} overflows",
                score_a, score_b
            ))
        })?;

        Ok(Self {
            team_a,
            team_b,
            outcome: Outcome::from_score_diff(score_diff),
            score_diff,
        })
    }

    pub fn is_draw(&self) -> bool {
        self.outcome == Outcome::Draw
    }
}

/// Prior means and standard deviations of the two skills in one match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillPriors {
    pub mean_a: f64,
    pub mean_b: f64,
    pub stddev_a: f64,
    pub stddev_b: f64,
}

impl SkillPriors {
    pub fn from_beliefs(belief_a: &SkillBelief, belief_b: &SkillBelief) -> Self {
        Self {
            mean_a: belief_a.mean,
            mean_b: belief_b.mean,
            stddev_a: belief_a.stddev,
            stddev_b: belief_b.stddev,
        }
    }
}

/// Moment-matched Gaussian summary of a chain after burn-in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PosteriorSummary {
    pub mean_a: f64,
    pub std_a: f64,
    pub mean_b: f64,
    pub std_b: f64,
}

impl PosteriorSummary {
    pub fn belief_a(&self) -> SkillBelief {
        SkillBelief::new(self.mean_a, self.std_a)
    }

    pub fn belief_b(&self) -> SkillBelief {
        SkillBelief::new(self.mean_b, self.std_b)
    }
}
