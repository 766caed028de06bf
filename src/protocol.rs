//! Request/response contracts exchanged with the scenario server
//!
//! Every response carries full state; the client replaces its view
//! wholesale and never computes deltas itself.

use serde::{Deserialize, Serialize};

use crate::core::types::{SessionId, Skill, SkillBlock, SkillTotals};

/// A roster member, as served by the roster endpoint and echoed back on
/// session start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub role: String,
    #[serde(default = "default_cost")]
    pub cost: u32,
    #[serde(default)]
    pub stats: SkillBlock,
}

fn default_cost() -> u32 {
    50
}

/// `GET /api/roster` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterResponse {
    #[serde(default)]
    pub budget: u32,
    #[serde(default)]
    pub members: Vec<Member>,
}

/// `GET /api/scenarios` response entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub briefing: String,
}

/// `POST /api/session` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRequest {
    pub scenario_id: String,
    #[serde(default)]
    pub team: Vec<Member>,
}

/// `POST /api/session` success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartResponse {
    pub session_id: SessionId,
    pub state: StateSnapshot,
    pub stage: Stage,
}

/// `POST /api/session/{id}/decision` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub option_id: String,
}

/// `POST /api/session/{id}/decision` success response
///
/// `finished=true` marks the terminal decision; `stage` is absent then.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub state: StateSnapshot,
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

/// Full simulation state as owned by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub budget: i64,
    pub reputation: i64,
    pub risk: i64,
    #[serde(default)]
    pub current_stage: String,
    #[serde(default)]
    pub current_challenge_index: usize,
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
    #[serde(default)]
    pub team_score: i64,
    #[serde(default)]
    pub team_totals: SkillTotals,
    #[serde(default)]
    pub team_size: usize,
}

/// One resolved decision as recorded in the snapshot history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub stage: String,
    #[serde(default)]
    pub challenge: String,
    pub option: String,
    pub outcome: String,
}

/// One step of a session as presented to the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub is_injection: bool,
    #[serde(default)]
    pub challenges: Vec<Challenge>,
}

/// A decision point within a stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
}

/// A selectable option; skill, difficulty, and probability are optional on
/// the wire and resolved to display defaults by the presenter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub narrative: String,
    #[serde(default)]
    pub skill: Option<Skill>,
    #[serde(default)]
    pub difficulty: Option<i64>,
    #[serde(default)]
    pub probability: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_defaults() {
        let member: Member =
            serde_json::from_str(r#"{"name": "Ada", "role": "Analyst"}"#).unwrap();
        assert_eq!(member.cost, 50);
        assert_eq!(member.stats.analysis, 50);
    }

    #[test]
    fn test_decision_response_with_null_stage() {
        let json = r#"{
            "state": {"budget": 95, "reputation": 70, "risk": 50},
            "stage": null,
            "finished": true
        }"#;
        let response: DecisionResponse = serde_json::from_str(json).unwrap();
        assert!(response.finished);
        assert!(response.stage.is_none());
        assert_eq!(response.state.budget, 95);
        assert!(response.state.history.is_empty());
        assert_eq!(response.state.team_totals.analysis, 0);
    }

    #[test]
    fn test_option_optionals_absent() {
        let json = r#"{"id": "o1", "label": "Act"}"#;
        let option: ChoiceOption = serde_json::from_str(json).unwrap();
        assert!(option.skill.is_none());
        assert!(option.difficulty.is_none());
        assert!(option.probability.is_none());
    }

    #[test]
    fn test_start_request_shape() {
        let request = StartRequest {
            scenario_id: "breach".into(),
            team: vec![],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["scenario_id"], "breach");
        assert!(json["team"].as_array().unwrap().is_empty());
    }
}
