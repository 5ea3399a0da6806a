//! Test fixtures shared by the integration tests

use gibbs_rating::config::GibbsConfig;
use gibbs_rating::types::{MatchObservation, SkillBelief, TeamId};
use std::io::Write;
use tempfile::NamedTempFile;

/// Opening rounds of a league season in the team1/team2/score1/score2 layout
pub const LEAGUE_CSV: &str = "\
yyyy-mm-dd,HH:MM,team1,team2,score1,score2
2018-08-18,18:00,Chievo,Juventus,2,3
2018-08-18,20:30,Lazio,Napoli,1,2
2018-08-19,18:00,Torino,Roma,0,1
2018-08-19,18:00,Sassuolo,Inter,1,0
2018-08-19,20:30,Parma,Udinese,2,2
2018-08-19,20:30,Empoli,Cagliari,2,0
2018-08-25,18:00,Juventus,Lazio,2,0
2018-08-25,20:30,Napoli,Milan,3,2
2018-08-26,18:00,Roma,Atalanta,3,3
2018-08-26,20:30,Inter,Torino,2,2
2018-08-26,20:30,Udinese,Sampdoria,1,0
2018-09-01,18:00,Chievo,Empoli,0,0
2018-09-01,20:30,Cagliari,Sassuolo,2,2
2018-09-02,15:00,Milan,Roma,2,1
2018-09-02,20:30,Atalanta,Cagliari,0,1
2018-09-02,20:30,Juventus,Parma,2,1
";

/// Write CSV content to a temporary file that lives as long as the handle
pub fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

/// Default sampler settings with a fixed seed
pub fn seeded_config(seed: u64) -> GibbsConfig {
    GibbsConfig {
        seed: Some(seed),
        ..GibbsConfig::default()
    }
}

pub fn observation(team_a: &str, team_b: &str, score_a: i64, score_b: i64) -> MatchObservation {
    MatchObservation::from_scores(team_a.to_string(), team_b.to_string(), score_a, score_b)
        .expect("score differential in range")
}

/// Default prior for each named team
pub fn default_beliefs(teams: &[&str]) -> Vec<(TeamId, SkillBelief)> {
    teams
        .iter()
        .map(|team| (team.to_string(), SkillBelief::new(25.0, 25.0 / 3.0)))
        .collect()
}
