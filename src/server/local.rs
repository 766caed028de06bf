//! In-process scenario server
//!
//! Carries the same semantics as the HTTP API: server-authoritative team
//! resolution, budget enforcement, and a registry of live engines keyed by
//! session identifier. Finished sessions are dropped from the registry.

use std::collections::HashMap;

use async_trait::async_trait;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::config::SimulationSettings;
use crate::core::error::{Result, SimError};
use crate::core::types::SessionId;
use crate::engine::scenario::ScenarioDef;
use crate::engine::sim::SimulationEngine;
use crate::protocol::{
    DecisionRequest, DecisionResponse, Member, RosterResponse, ScenarioSummary, StartRequest,
    StartResponse,
};
use crate::roster::Roster;
use crate::server::ScenarioServer;

/// Scenario server embedded in the client process
pub struct LocalServer {
    scenarios: Vec<ScenarioDef>,
    roster: Roster,
    settings: SimulationSettings,
    seed: Option<u64>,
    sessions: Mutex<HashMap<SessionId, SimulationEngine>>,
}

impl LocalServer {
    pub fn new(scenarios: Vec<ScenarioDef>, roster: Roster, settings: SimulationSettings) -> Self {
        Self {
            scenarios,
            roster,
            settings,
            seed: None,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Fix the engine seed for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn engine_rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

#[async_trait]
impl ScenarioServer for LocalServer {
    async fn fetch_roster(&self) -> Result<RosterResponse> {
        Ok(RosterResponse {
            budget: self.settings.team_budget,
            members: self.roster.members().to_vec(),
        })
    }

    async fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>> {
        Ok(self
            .scenarios
            .iter()
            .map(|scenario| ScenarioSummary {
                id: scenario.id.clone(),
                name: scenario.name.clone(),
                briefing: scenario.briefing.clone(),
            })
            .collect())
    }

    async fn start_session(&self, request: &StartRequest) -> Result<StartResponse> {
        let scenario = self
            .scenarios
            .iter()
            .find(|scenario| scenario.id == request.scenario_id)
            .ok_or_else(|| SimError::ScenarioNotFound(request.scenario_id.clone()))?;

        // Team membership is resolved against the server's roster; unknown
        // names are dropped rather than trusted from the request.
        let mut team: Vec<Member> = Vec::new();
        let mut total_cost = 0u32;
        for entry in &request.team {
            if let Some(member) = self.roster.get(&entry.name) {
                total_cost += member.cost;
                team.push(member.clone());
            }
        }
        if self.settings.team_budget > 0 && total_cost > self.settings.team_budget {
            return Err(SimError::TeamOverBudget {
                cost: total_cost,
                budget: self.settings.team_budget,
            });
        }

        let session_id = SessionId(Uuid::new_v4().simple().to_string());
        let engine = SimulationEngine::new(
            scenario.clone(),
            team,
            self.settings.clone(),
            self.engine_rng(),
        );
        let state = engine.snapshot();
        let stage = engine.presentable()?;
        self.sessions
            .lock()
            .await
            .insert(session_id.clone(), engine);
        tracing::info!(session = %session_id, scenario = %request.scenario_id, "session created");

        Ok(StartResponse {
            session_id,
            state,
            stage,
        })
    }

    async fn submit_decision(
        &self,
        session_id: &SessionId,
        request: &DecisionRequest,
    ) -> Result<DecisionResponse> {
        let mut sessions = self.sessions.lock().await;
        let engine = sessions
            .get_mut(session_id)
            .ok_or_else(|| SimError::SessionNotFound(session_id.to_string()))?;

        let mut response = engine.apply_option(&request.option_id)?;
        if response.finished {
            sessions.remove(session_id);
            tracing::info!(session = %session_id, "session finished and dropped");
        } else {
            response.stage = Some(engine.presentable()?);
        }
        Ok(response)
    }
}
