//! Tournament matchup configuration (`tournament_steps.json`).
//!
//! ```json
//! [
//!   {"agents": [{"class": "agents.boulware.Boulware"}, {"class": "agents.conceder.Conceder"}],
//!    "profiles": ["domains/domain00/profileA.json", "domains/domain00/profileB.json"]}
//! ]
//! ```
//!
//! Entries are in ordinal order; the first agent plays seat A on the first
//! profile.

use std::fs;
use std::path::Path;

use aggregate::{Matchup, MatchupTable};
use serde::Deserialize;
use types::DomainId;

use crate::error::{Result, StorageError};

/// File name of a tournament's matchup list.
pub const MATCHUPS_FILE: &str = "tournament_steps.json";

#[derive(Debug, Deserialize)]
struct Step {
    agents: Vec<AgentSpec>,
    #[serde(default)]
    profiles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AgentSpec {
    class: String,
}

/// Short agent name: the last `.`-separated segment of its class path.
pub fn agent_name(class: &str) -> &str {
    class.rsplit('.').next().unwrap_or(class)
}

/// Parse a matchup list.
pub fn parse_matchups(text: &str) -> serde_json::Result<MatchupTable> {
    let steps: Vec<Step> = serde_json::from_str(text)?;
    let matchups = steps.into_iter().map(|step| {
        let mut agents = step.agents.iter().map(|agent| agent_name(&agent.class));
        let agent_a = agents.next().unwrap_or_default();
        let agent_b = agents.next().unwrap_or_default();
        let mut matchup = Matchup::new(agent_a, agent_b);
        if let [profile_a, profile_b, ..] = step.profiles.as_slice() {
            matchup = matchup.with_profiles(profile_a.as_str(), profile_b.as_str());
        }
        match step.profiles.first().and_then(|profile| DomainId::from_profile_path(profile)) {
            Some(domain) => matchup.with_domain(domain),
            None => matchup,
        }
    });
    Ok(MatchupTable::from_ordered(matchups))
}

/// Load `tournament_dir/tournament_steps.json`, if the tournament has one.
pub fn find_matchups(tournament_dir: &Path) -> Result<Option<MatchupTable>> {
    let path = tournament_dir.join(MATCHUPS_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    load_matchups(&path).map(Some)
}

pub fn load_matchups(path: &Path) -> Result<MatchupTable> {
    let text = fs::read_to_string(path).map_err(StorageError::io(path))?;
    parse_matchups(&text).map_err(StorageError::json(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::Ordinal;

    #[test]
    fn test_agent_name() {
        assert_eq!(agent_name("agents.agent61.agent61.Agent61"), "Agent61");
        assert_eq!(agent_name("Boulware"), "Boulware");
    }

    #[test]
    fn test_parse_matchups() {
        let json = r#"[
            {"agents": [{"class": "agents.boulware.Boulware"},
                        {"class": "agents.conceder.Conceder", "parameters": {"e": 2.0}}],
             "profiles": ["domains/domain07/profileA.json", "domains/domain07/profileB.json"]},
            {"agents": [{"class": "agents.conceder.Conceder"}, {"class": "agents.boulware.Boulware"}]}
        ]"#;

        let table = parse_matchups(json).unwrap();
        assert_eq!(table.len(), 2);

        let first = table.get(Ordinal(1)).unwrap();
        assert_eq!(first.agents.a, "Boulware");
        assert_eq!(first.agents.b, "Conceder");
        assert_eq!(first.domain, Some(DomainId::from("domain07")));
        let profiles = first.profiles.as_ref().unwrap();
        assert_eq!(profiles.b, "domains/domain07/profileB.json");

        let second = table.get(Ordinal(2)).unwrap();
        assert_eq!(second.agents.a, "Conceder");
        assert!(second.domain.is_none());
        assert!(second.profiles.is_none());
    }
}
