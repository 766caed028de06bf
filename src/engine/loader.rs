//! Scenario and roster data loading
//!
//! Scenarios, shared injections, and the roster live as TOML files in one
//! data directory. Only files that declare stages are scenarios; the other
//! files in the directory are skipped by the scan.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::error::Result;
use crate::engine::scenario::{Injection, ScenarioDef};
use crate::protocol::Member;
use crate::roster::Roster;

/// File holding injections shared by every scenario
const GLOBAL_INJECTIONS_FILE: &str = "injections.toml";

/// File holding the team roster
const ROSTER_FILE: &str = "roster.toml";

#[derive(Debug, Deserialize)]
struct InjectionsFile {
    #[serde(default)]
    injections: Vec<Injection>,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    members: Vec<Member>,
}

/// Load all scenario definitions from a data directory
///
/// Global injections are merged ahead of each scenario's own.
pub fn load_scenarios(data_dir: &Path) -> Result<Vec<ScenarioDef>> {
    let global_injections = load_global_injections(data_dir)?;

    let mut paths: Vec<_> = fs::read_dir(data_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    let mut scenarios = Vec::new();
    for path in paths {
        let text = fs::read_to_string(&path)?;
        let value: toml::Value = text.parse()?;
        // Roster and injections share the directory; only stage-bearing
        // files are scenarios.
        if value.get("stages").is_none() {
            continue;
        }
        let mut scenario: ScenarioDef = value.try_into()?;
        scenario.injections = global_injections
            .iter()
            .cloned()
            .chain(scenario.injections)
            .collect();
        tracing::debug!(scenario = %scenario.id, path = %path.display(), "loaded scenario");
        scenarios.push(scenario);
    }
    Ok(scenarios)
}

fn load_global_injections(data_dir: &Path) -> Result<Vec<Injection>> {
    let path = data_dir.join(GLOBAL_INJECTIONS_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file: InjectionsFile = toml::from_str(&fs::read_to_string(path)?)?;
    Ok(file.injections)
}

/// Load the roster, degrading to an empty roster when the file is missing
/// or unreadable
pub fn load_roster(data_dir: &Path, budget: u32) -> Roster {
    match try_load_roster(data_dir, budget) {
        Ok(roster) => roster,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load roster");
            Roster::empty()
        }
    }
}

fn try_load_roster(data_dir: &Path, budget: u32) -> Result<Roster> {
    let file: RosterFile = toml::from_str(&fs::read_to_string(data_dir.join(ROSTER_FILE))?)?;
    Ok(Roster::new(budget, file.members))
}
