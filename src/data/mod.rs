//! Match table loading
//!
//! Reads chronological match results from CSV. The table needs the columns
//! `team1,team2,score1,score2`; any other columns are ignored and row order is
//! preserved, since ratings depend on it.
//!
//! ```ignore
//! use gibbs_rating::data::MatchTable;
//! use std::path::Path;
//!
//! let table = MatchTable::from_path(Path::new("SerieA.csv"))?;
//! println!("{} matches between {} teams", table.len(), table.team_names().len());
//! ```

use crate::error::{RatingError, Result};
use crate::types::{MatchObservation, MatchRecord, TeamId};
use anyhow::Context;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Ordered match results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchTable {
    records: Vec<MatchRecord>,
}

impl MatchTable {
    pub fn new(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }

    /// Load a table from a CSV file
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open match table: {}", path.display()))?;
        let table = Self::from_reader(file)
            .with_context(|| format!("Failed to read match table: {}", path.display()))?;

        info!(
            "Loaded {} matches between {} teams from {}",
            table.len(),
            table.team_names().len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse CSV from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().context("Missing CSV header row")?.clone();
        let mut records = Vec::new();

        for result in reader.records() {
            let row = result.context("Malformed CSV row")?;
            let line = row.position().map(|p| p.line() as usize).unwrap_or(0);

            let record: MatchRecord = row.deserialize(Some(&headers)).map_err(|e| {
                RatingError::InvalidMatchRecord {
                    line,
                    reason: e.to_string(),
                }
            })?;
            validate_record(&record, line)?;
            records.push(record);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Matches in table order, reduced to what inference needs
    pub fn observations(&self) -> Result<Vec<MatchObservation>> {
        self.records.iter().map(MatchRecord::observation).collect()
    }

    /// Every team in order of first appearance, home or away
    pub fn team_names(&self) -> Vec<TeamId> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for record in &self.records {
            for team in [&record.team1, &record.team2] {
                if seen.insert(team.as_str()) {
                    names.push(team.clone());
                }
            }
        }
        names
    }
}

fn validate_record(record: &MatchRecord, line: usize) -> Result<()> {
    if record.team1.is_empty() || record.team2.is_empty() {
        return Err(RatingError::InvalidMatchRecord {
            line,
            reason: "empty team name".to_string(),
        }
        .into());
    }
    if record.team1 == record.team2 {
        return Err(RatingError::InvalidMatchRecord {
            line,
            reason: format!("{} cannot play itself", record.team1),
        }
        .into());
    }
    if record.score1.checked_sub(record.score2).is_none() {
        return Err(RatingError::InvalidMatchRecord {
            line,
            reason: format!(
                "score differential {} - {} is out of range",
                record.score1, record.score2
            ),
        }
        .into());
    }
    Ok(())
}
