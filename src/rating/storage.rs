//! Per-team belief table
//!
//! Holds the current belief of every registered team together with the
//! append-only history of every belief that team has held. The table is owned
//! by a single tracker and is never shared.

use crate::error::{RatingError, Result};
use crate::types::{SkillBelief, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// History entry for one team; the last element is the current belief
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEntry {
    pub team: TeamId,
    pub history: Vec<SkillBelief>,
}

impl TeamEntry {
    /// Create a new entry for a team that has not played yet
    pub fn new(team: TeamId, initial: SkillBelief) -> Self {
        Self {
            team,
            history: vec![initial],
        }
    }

    pub fn current(&self) -> SkillBelief {
        // Entries are created with one belief and only ever grow
        self.history[self.history.len() - 1]
    }

    /// Number of matches recorded after registration
    pub fn matches_played(&self) -> usize {
        self.history.len() - 1
    }

    fn commit(&mut self, belief: SkillBelief) {
        self.history.push(belief);
    }
}

/// Mapping from team to current belief plus history
#[derive(Debug, Clone, Default)]
pub struct BeliefTable {
    entries: BTreeMap<TeamId, TeamEntry>,
}

impl BeliefTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from explicit starting beliefs
    pub fn from_initial<I>(initial: I) -> Self
    where
        I: IntoIterator<Item = (TeamId, SkillBelief)>,
    {
        let mut table = Self::new();
        for (team, belief) in initial {
            table.register(team, belief);
        }
        table
    }

    /// Register a team. Returns false and leaves the entry untouched if the
    /// team is already known.
    pub fn register(&mut self, team: TeamId, initial: SkillBelief) -> bool {
        if self.entries.contains_key(&team) {
            return false;
        }
        self.entries
            .insert(team.clone(), TeamEntry::new(team, initial));
        true
    }

    pub fn contains(&self, team: &str) -> bool {
        self.entries.contains_key(team)
    }

    /// Current belief of a registered team
    pub fn current(&self, team: &str) -> Result<SkillBelief> {
        self.entries
            .get(team)
            .map(TeamEntry::current)
            .ok_or_else(|| {
                RatingError::UnknownTeam {
                    team: team.to_string(),
                }
                .into()
            })
    }

    /// Record a new belief for a registered team
    pub fn commit(&mut self, team: &str, belief: SkillBelief) -> Result<()> {
        let entry = self
            .entries
            .get_mut(team)
            .ok_or_else(|| RatingError::UnknownTeam {
                team: team.to_string(),
            })?;
        entry.commit(belief);
        Ok(())
    }

    pub fn history(&self, team: &str) -> Option<&[SkillBelief]> {
        self.entries.get(team).map(|entry| entry.history.as_slice())
    }

    pub fn entries(&self) -> impl Iterator<Item = &TeamEntry> {
        self.entries.values()
    }

    pub fn team_count(&self) -> usize {
        self.entries.len()
    }

    /// Consume the table, yielding every team's full history
    pub fn into_histories(self) -> BTreeMap<TeamId, Vec<SkillBelief>> {
        self.entries
            .into_iter()
            .map(|(team, entry)| (team, entry.history))
            .collect()
    }
}
