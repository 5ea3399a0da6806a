//! Chronological rating tracker
//!
//! Threads every team's belief through the match sequence: the prior used for
//! a team in match `m` is the posterior committed by that team's most recent
//! earlier match. Matches are processed strictly in input order.

use crate::config::FailurePolicy;
use crate::error::{RatingError, Result};
use crate::rating::calculator::{MatchUpdate, RatingCalculator};
use crate::rating::storage::BeliefTable;
use crate::types::{MatchObservation, SkillBelief, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Counters collected over one sequence run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceStats {
    pub matches_processed: usize,
    pub draws: usize,
    pub skipped: usize,
    /// Post-burn-in sampling time summed over all chains
    pub sampling_time: Duration,
}

/// Owns the belief table and feeds each match through a calculator
#[derive(Debug)]
pub struct RatingTracker<C: RatingCalculator> {
    calculator: C,
    table: BeliefTable,
    failure_policy: FailurePolicy,
    stats: SequenceStats,
}

impl<C: RatingCalculator> RatingTracker<C> {
    pub fn new(calculator: C, failure_policy: FailurePolicy) -> Self {
        Self {
            calculator,
            table: BeliefTable::new(),
            failure_policy,
            stats: SequenceStats::default(),
        }
    }

    /// Start from explicit beliefs instead of an empty table
    pub fn with_beliefs<I>(calculator: C, failure_policy: FailurePolicy, initial: I) -> Self
    where
        I: IntoIterator<Item = (TeamId, SkillBelief)>,
    {
        Self {
            calculator,
            table: BeliefTable::from_initial(initial),
            failure_policy,
            stats: SequenceStats::default(),
        }
    }

    /// Register teams that are not yet known with the calculator's initial belief
    pub fn register_teams<I, S>(&mut self, teams: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<TeamId>,
    {
        let initial = self.calculator.initial_belief();
        for team in teams {
            self.table.register(team.into(), initial);
        }
    }

    pub fn table(&self) -> &BeliefTable {
        &self.table
    }

    pub fn stats(&self) -> &SequenceStats {
        &self.stats
    }

    /// Process a single match and commit both new beliefs.
    ///
    /// Both teams must already be registered and must be distinct.
    pub fn process(&mut self, observation: &MatchObservation) -> Result<MatchUpdate> {
        if observation.team_a == observation.team_b {
            return Err(RatingError::invalid_parameter(format!(
                "{} cannot play itself",
                observation.team_a
            )));
        }

        let belief_a = self.table.current(&observation.team_a)?;
        let belief_b = self.table.current(&observation.team_b)?;

        let update = self
            .calculator
            .process_match(&belief_a, &belief_b, observation)?;

        self.table.commit(&observation.team_a, update.belief_a)?;
        self.table.commit(&observation.team_b, update.belief_b)?;

        self.stats.matches_processed += 1;
        if observation.is_draw() {
            self.stats.draws += 1;
        }
        self.stats.sampling_time += update.elapsed;

        Ok(update)
    }

    /// Process every match in order, applying the failure policy to errors
    pub fn run(&mut self, matches: &[MatchObservation]) -> Result<&SequenceStats> {
        info!(
            "Rating {} matches across {} teams",
            matches.len(),
            self.table.team_count()
        );

        for (index, observation) in matches.iter().enumerate() {
            if let Err(e) = self.process(observation) {
                match self.failure_policy {
                    FailurePolicy::Abort => {
                        return Err(e.context(format!(
                            "match {} ({} vs {}) failed",
                            index, observation.team_a, observation.team_b
                        )));
                    }
                    FailurePolicy::Skip => {
                        warn!(
                            "Skipping match {} ({} vs {}): {:#}",
                            index, observation.team_a, observation.team_b, e
                        );
                        self.carry_forward(observation);
                        self.stats.skipped += 1;
                    }
                }
            }

            if (index + 1) % 20 == 0 {
                debug!("Processed {} / {} matches", index + 1, matches.len());
            }
        }

        info!(
            "Finished {} matches ({} draws, {} skipped) in {:.3}s of sampling",
            self.stats.matches_processed,
            self.stats.draws,
            self.stats.skipped,
            self.stats.sampling_time.as_secs_f64()
        );

        Ok(&self.stats)
    }

    /// Repeat the current belief of every registered participant
    fn carry_forward(&mut self, observation: &MatchObservation) {
        let mut teams = vec![&observation.team_a];
        if observation.team_b != observation.team_a {
            teams.push(&observation.team_b);
        }

        for team in teams {
            if let Ok(belief) = self.table.current(team) {
                // Registered teams cannot fail to commit
                let _ = self.table.commit(team, belief);
            }
        }
    }

    /// Consume the tracker, yielding every team's belief history
    pub fn into_histories(self) -> BTreeMap<TeamId, Vec<SkillBelief>> {
        self.table.into_histories()
    }
}

/// Run a whole match sequence from explicit starting beliefs, aborting on the
/// first failing match.
///
/// Every team referenced by a match must appear in `initial_beliefs`. The
/// result holds, for each team, its starting belief followed by one belief per
/// match it took part in.
pub fn run_sequence<C, I>(
    calculator: C,
    matches: &[MatchObservation],
    initial_beliefs: I,
) -> Result<BTreeMap<TeamId, Vec<SkillBelief>>>
where
    C: RatingCalculator,
    I: IntoIterator<Item = (TeamId, SkillBelief)>,
{
    let mut tracker =
        RatingTracker::with_beliefs(calculator, FailurePolicy::Abort, initial_beliefs);
    tracker.run(matches)?;
    Ok(tracker.into_histories())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::rating_error;

    /// Winner gains one point, loser drops one; uncertainty shrinks by 10%
    #[derive(Debug, Default)]
    struct StepCalculator {
        calls: usize,
    }

    impl RatingCalculator for StepCalculator {
        fn process_match(
            &mut self,
            belief_a: &SkillBelief,
            belief_b: &SkillBelief,
            observation: &MatchObservation,
        ) -> Result<MatchUpdate> {
            self.calls += 1;
            let step = f64::from(observation.outcome.sign());
            Ok(MatchUpdate {
                belief_a: SkillBelief::new(belief_a.mean + step, belief_a.stddev * 0.9),
                belief_b: SkillBelief::new(belief_b.mean - step, belief_b.stddev * 0.9),
                posterior: None,
                elapsed: Duration::ZERO,
            })
        }

        fn initial_belief(&self) -> SkillBelief {
            SkillBelief::new(0.0, 1.0)
        }
    }

    /// Fails on every match involving the named team
    #[derive(Debug)]
    struct FailingCalculator {
        poisoned: &'static str,
    }

    impl RatingCalculator for FailingCalculator {
        fn process_match(
            &mut self,
            belief_a: &SkillBelief,
            belief_b: &SkillBelief,
            observation: &MatchObservation,
        ) -> Result<MatchUpdate> {
            if observation.team_a == self.poisoned || observation.team_b == self.poisoned {
                return Err(RatingError::invalid_parameter("poisoned match"));
            }
            Ok(MatchUpdate::unchanged(
                SkillBelief::new(belief_a.mean + 1.0, belief_a.stddev),
                *belief_b,
            ))
        }

        fn initial_belief(&self) -> SkillBelief {
            SkillBelief::default()
        }
    }

    fn observation(a: &str, b: &str, score_a: i64, score_b: i64) -> MatchObservation {
        MatchObservation::from_scores(a.to_string(), b.to_string(), score_a, score_b).unwrap()
    }

    #[test]
    fn test_beliefs_thread_through_matches() {
        let mut tracker = RatingTracker::new(StepCalculator::default(), FailurePolicy::Abort);
        tracker.register_teams(["A", "B", "C"]);

        let matches = vec![
            observation("A", "B", 2, 0),
            observation("B", "C", 1, 0),
            observation("A", "C", 0, 3),
        ];
        tracker.run(&matches).unwrap();

        let histories = tracker.into_histories();
        // A: +1 then -1
        assert_eq!(histories["A"].iter().map(|b| b.mean).collect::<Vec<_>>(), vec![0.0, 1.0, 0.0]);
        // B: -1 then +1, starting from the posterior of match 1
        assert_eq!(histories["B"].iter().map(|b| b.mean).collect::<Vec<_>>(), vec![0.0, -1.0, 0.0]);
        // C: -1 then +1
        assert_eq!(histories["C"].iter().map(|b| b.mean).collect::<Vec<_>>(), vec![0.0, -1.0, 0.0]);
        assert!((histories["B"][2].stddev - 0.81).abs() < 1e-12);
    }

    #[test]
    fn test_history_length_counts_participation() {
        let mut tracker = RatingTracker::new(StepCalculator::default(), FailurePolicy::Abort);
        tracker.register_teams(["A", "B", "C", "D"]);

        let matches = vec![
            observation("A", "B", 1, 0),
            observation("A", "C", 1, 1),
            observation("A", "B", 0, 1),
        ];
        let stats = tracker.run(&matches).unwrap().clone();
        assert_eq!(stats.matches_processed, 3);
        assert_eq!(stats.draws, 1);

        let histories = tracker.into_histories();
        assert_eq!(histories["A"].len(), 4);
        assert_eq!(histories["B"].len(), 3);
        assert_eq!(histories["C"].len(), 2);
        assert_eq!(histories["D"].len(), 1);
    }

    #[test]
    fn test_unknown_team_fails_fast() {
        let calculator = StepCalculator::default();
        let matches = vec![observation("A", "B", 1, 0), observation("A", "Z", 1, 0)];
        let initial = vec![
            ("A".to_string(), SkillBelief::default()),
            ("B".to_string(), SkillBelief::default()),
        ];

        let err = run_sequence(calculator, &matches, initial).unwrap_err();
        assert_eq!(
            rating_error(&err),
            Some(&RatingError::UnknownTeam {
                team: "Z".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_team_does_not_touch_known_team() {
        let mut tracker = RatingTracker::new(StepCalculator::default(), FailurePolicy::Abort);
        tracker.register_teams(["A"]);

        assert!(tracker.process(&observation("A", "Ghost", 2, 1)).is_err());
        assert_eq!(tracker.table().history("A").unwrap().len(), 1);
        assert_eq!(tracker.calculator.calls, 0);
    }

    #[test]
    fn test_self_match_rejected() {
        let mut tracker = RatingTracker::new(StepCalculator::default(), FailurePolicy::Abort);
        tracker.register_teams(["A", "B"]);

        let err = tracker.process(&observation("A", "A", 2, 1)).unwrap_err();
        assert!(matches!(
            rating_error(&err),
            Some(RatingError::InvalidParameter { .. })
        ));
        assert_eq!(tracker.table().history("A").unwrap().len(), 1);
        assert_eq!(tracker.calculator.calls, 0);
        assert_eq!(tracker.stats().matches_processed, 0);
    }

    #[test]
    fn test_skipped_self_match_keeps_history_length() {
        let mut tracker = RatingTracker::new(StepCalculator::default(), FailurePolicy::Skip);
        tracker.register_teams(["A", "B"]);

        let matches = vec![observation("A", "A", 1, 0), observation("A", "B", 1, 0)];
        let stats = tracker.run(&matches).unwrap().clone();
        assert_eq!(stats.skipped, 1);

        let histories = tracker.into_histories();
        // One carried-forward entry for the skipped match, one for the real one
        assert_eq!(histories["A"].len(), 3);
        assert_eq!(histories["B"].len(), 2);
    }

    #[test]
    fn test_abort_policy_stops_run() {
        let mut tracker =
            RatingTracker::new(FailingCalculator { poisoned: "X" }, FailurePolicy::Abort);
        tracker.register_teams(["A", "B", "X"]);

        let matches = vec![observation("A", "X", 1, 0), observation("A", "B", 1, 0)];
        let err = tracker.run(&matches).unwrap_err();
        assert!(matches!(
            rating_error(&err),
            Some(RatingError::InvalidParameter { .. })
        ));
        // The second match never ran
        assert_eq!(tracker.table().history("B").unwrap().len(), 1);
    }

    #[test]
    fn test_skip_policy_carries_beliefs_forward() {
        let mut tracker =
            RatingTracker::new(FailingCalculator { poisoned: "X" }, FailurePolicy::Skip);
        tracker.register_teams(["A", "B", "X"]);

        let matches = vec![
            observation("A", "X", 1, 0),
            observation("A", "B", 1, 0),
            observation("A", "Nobody", 1, 0),
        ];
        let stats = tracker.run(&matches).unwrap().clone();
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.matches_processed, 1);

        let histories = tracker.into_histories();
        let a: Vec<f64> = histories["A"].iter().map(|b| b.mean).collect();
        assert_eq!(a, vec![25.0, 25.0, 26.0, 26.0]);
        assert_eq!(histories["X"].len(), 2);
        assert!(!histories.contains_key("Nobody"));
    }
}
