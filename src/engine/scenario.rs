//! Scenario definitions as authored in data files

use serde::{Deserialize, Serialize};

use crate::core::types::Skill;

/// Resulting impacts for a branch (success or failure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub description: String,
    #[serde(default)]
    pub budget_delta: Option<i64>,
    #[serde(default)]
    pub reputation_delta: Option<i64>,
    #[serde(default)]
    pub risk_delta: Option<i64>,
    /// Stage to jump to after the last challenge of the current stage
    #[serde(default)]
    pub next_stage: Option<String>,
    #[serde(default)]
    pub action: Option<OutcomeAction>,
}

/// Special effects an outcome can trigger beyond numeric deltas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeAction {
    /// Terminate the session immediately
    End,
    /// Lose the longest-serving team member
    RemoveMember,
    /// Clear accumulated team stress
    ResetTeam,
    /// Raise team cohesion
    BoostMorale,
    /// Lower team cohesion
    DamageMorale,
    /// Emergency budget grant
    DoubleBudget,
    /// Emergency expenditure
    BurnBudget,
}

/// A decision the player can make for a challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDef {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub narrative: String,
    pub success: Outcome,
    /// Omitted failures get a derived branch at resolution time
    #[serde(default)]
    pub failure: Option<Outcome>,
    /// Baseline 0-100 against the team's skill total; higher is harder
    #[serde(default = "default_difficulty")]
    pub difficulty: i64,
    /// Which team ability applies
    #[serde(default = "default_skill")]
    pub skill: Skill,
}

fn default_difficulty() -> i64 {
    100
}

fn default_skill() -> Skill {
    Skill::Analysis
}

/// Single decision point presented to the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeDef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<OptionDef>,
}

/// Unplanned event that can interrupt the scheduled sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Injection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub prompt: String,
    /// Relative draw weight among pending injections
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub options: Vec<OptionDef>,
}

fn default_weight() -> u32 {
    5
}

/// Phase of a scenario (e.g. detection, containment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub challenges: Vec<ChallengeDef>,
}

/// Top-level game definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub briefing: String,
    pub starting_stage: String,
    pub stages: Vec<StageDef>,
    #[serde(default)]
    pub injections: Vec<Injection>,
}

impl ScenarioDef {
    pub fn stage(&self, id: &str) -> Option<&StageDef> {
        self.stages.iter().find(|stage| stage.id == id)
    }
}
