//! Per-session simulation runtime
//!
//! Owns all mutable simulation state for one session. Clients only ever see
//! snapshots; every mutation happens here in response to `apply_option`.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationSettings;
use crate::core::error::{Result, SimError};
use crate::core::types::SkillTotals;
use crate::engine::scenario::{Injection, OptionDef, Outcome, OutcomeAction, ScenarioDef};
use crate::protocol::{
    Challenge, ChoiceOption, DecisionResponse, HistoryRecord, Member, Stage, StateSnapshot,
};

/// Morale shift applied by the boost-morale and damage-morale actions
const MORALE_STEP: i64 = 10;

/// Mutable simulation runtime for one session
pub struct SimulationEngine {
    scenario: ScenarioDef,
    team: Vec<Member>,
    state: StateSnapshot,
    round: u32,
    settings: SimulationSettings,
    pending_injections: Vec<Injection>,
    active_injection: Option<Injection>,
    rng: ChaCha8Rng,
}

impl SimulationEngine {
    pub fn new(
        scenario: ScenarioDef,
        team: Vec<Member>,
        settings: SimulationSettings,
        rng: ChaCha8Rng,
    ) -> Self {
        let team_totals = Self::totals_of(&team);
        let team_score = Self::score_of(&team_totals, team.len());
        let state = StateSnapshot {
            budget: settings.default_budget,
            reputation: settings.base_reputation,
            risk: 50,
            current_stage: scenario.starting_stage.clone(),
            current_challenge_index: 0,
            history: Vec::new(),
            team_score,
            team_totals,
            team_size: team.len(),
        };
        let pending_injections = scenario.injections.clone();
        Self {
            scenario,
            team,
            state,
            round: 0,
            settings,
            pending_injections,
            active_injection: None,
            rng,
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.state.clone()
    }

    /// The current stage or the active injection as a presentable payload
    ///
    /// One challenge is surfaced at a time, with per-option success
    /// probabilities annotated as integer percentages.
    pub fn presentable(&self) -> Result<Stage> {
        if let Some(injection) = &self.active_injection {
            return Ok(Stage {
                id: format!("injection-{}", injection.id),
                title: format!("Injection: {}", injection.title),
                summary: "Unplanned event disrupts your plan.".to_string(),
                is_injection: true,
                challenges: vec![self.challenge_payload(
                    &injection.id,
                    &injection.title,
                    &injection.prompt,
                    &injection.options,
                )],
            });
        }

        let stage = self
            .scenario
            .stage(&self.state.current_stage)
            .ok_or_else(|| {
                SimError::MalformedScenario(format!("unknown stage {}", self.state.current_stage))
            })?;
        let challenge = stage
            .challenges
            .get(self.state.current_challenge_index)
            .ok_or_else(|| {
                SimError::MalformedScenario(format!(
                    "stage {} has no challenge at index {}",
                    stage.id, self.state.current_challenge_index
                ))
            })?;
        Ok(Stage {
            id: stage.id.clone(),
            title: stage.title.clone(),
            summary: stage.summary.clone(),
            is_injection: false,
            challenges: vec![self.challenge_payload(
                &challenge.id,
                &challenge.title,
                &challenge.prompt,
                &challenge.options,
            )],
        })
    }

    /// Resolve one decision: pick the branch, apply its impacts, advance
    /// the schedule, and maybe arm an injection
    pub fn apply_option(&mut self, option_id: &str) -> Result<DecisionResponse> {
        let was_injection = self.active_injection.is_some();
        let presented_id = match &self.active_injection {
            Some(injection) => format!("injection-{}", injection.id),
            None => self.state.current_stage.clone(),
        };

        let option = self.find_option(option_id)?.clone();
        let success = self.rng.gen::<f64>() < self.chance(&option);
        let outcome = if success {
            option.success.clone()
        } else {
            self.derived_failure(&option)
        };
        self.round += 1;

        if let Some(delta) = outcome.budget_delta {
            self.state.budget += delta;
        }
        // Team upkeep drains budget every round.
        self.state.budget -= self.state.team_score / 10;

        if let Some(delta) = outcome.reputation_delta {
            self.state.reputation += delta;
        }
        if let Some(delta) = outcome.risk_delta {
            self.state.risk = (self.state.risk + delta).clamp(0, 100);
        }

        let mut finished = false;

        self.state.history.push(HistoryRecord {
            stage: presented_id,
            challenge: option.id.clone(),
            option: option.label.clone(),
            outcome: outcome.description.clone(),
        });

        if let Some(action) = outcome.action {
            if action == OutcomeAction::End {
                finished = true;
            } else {
                self.execute_action(action);
            }
        }

        if was_injection {
            self.active_injection = None;
        } else {
            let stage = self
                .scenario
                .stage(&self.state.current_stage)
                .ok_or_else(|| {
                    SimError::MalformedScenario(format!(
                        "unknown stage {}",
                        self.state.current_stage
                    ))
                })?;
            let is_last = self.state.current_challenge_index + 1 >= stage.challenges.len();
            if is_last {
                match &outcome.next_stage {
                    Some(next) => {
                        self.state.current_stage = next.clone();
                        self.state.current_challenge_index = 0;
                    }
                    None => finished = true,
                }
            } else {
                // Stage transitions wait for the last challenge.
                self.state.current_challenge_index += 1;
            }

            if !self.pending_injections.is_empty() {
                self.maybe_arm_injection();
            }
            finished = finished || self.round >= self.settings.max_rounds;
        }

        Ok(DecisionResponse {
            state: self.snapshot(),
            // The caller attaches the next presentable when not finished.
            stage: None,
            finished,
            round: self.round,
            outcome: Some(outcome.description),
            success: Some(success),
        })
    }

    /// Success chance for an option against the current team
    fn chance(&self, option: &OptionDef) -> f64 {
        let stat_total = self.state.team_totals.get(option.skill);
        let delta = (stat_total - option.difficulty) as f64 / 200.0;
        (0.5 + delta).clamp(0.05, 0.95)
    }

    fn chance_percent(&self, option: &OptionDef) -> i64 {
        (self.chance(option) * 100.0).round() as i64
    }

    /// Derive a failure branch when the author omitted one
    fn derived_failure(&self, option: &OptionDef) -> Outcome {
        if let Some(failure) = &option.failure {
            return failure.clone();
        }
        let success = &option.success;
        Outcome {
            description: format!("Failed: {}", success.description),
            budget_delta: Some(
                success
                    .budget_delta
                    .map(|delta| -delta.abs())
                    .filter(|delta| *delta != 0)
                    .unwrap_or(-2),
            ),
            reputation_delta: Some(
                success
                    .reputation_delta
                    .map(|delta| -delta.abs())
                    .filter(|delta| *delta != 0)
                    .unwrap_or(-2),
            ),
            risk_delta: Some(success.risk_delta.map(i64::abs).unwrap_or(0) + 2),
            next_stage: success.next_stage.clone(),
            action: None,
        }
    }

    fn find_option(&self, option_id: &str) -> Result<&OptionDef> {
        let options = match &self.active_injection {
            Some(injection) => &injection.options,
            None => {
                let stage = self
                    .scenario
                    .stage(&self.state.current_stage)
                    .ok_or_else(|| {
                        SimError::MalformedScenario(format!(
                            "unknown stage {}",
                            self.state.current_stage
                        ))
                    })?;
                let challenge = stage
                    .challenges
                    .get(self.state.current_challenge_index)
                    .ok_or_else(|| {
                        SimError::MalformedScenario(format!(
                            "stage {} has no challenge at index {}",
                            stage.id, self.state.current_challenge_index
                        ))
                    })?;
                &challenge.options
            }
        };
        options
            .iter()
            .find(|option| option.id == option_id)
            .ok_or_else(|| SimError::OptionNotFound(option_id.to_string()))
    }

    /// Roll for an unplanned event, weighted by injection weight and
    /// scaled by current risk
    fn maybe_arm_injection(&mut self) {
        let chance = (self.settings.injection_base_chance
            + self.state.risk as f64 * self.settings.injection_risk_factor)
            .min(self.settings.injection_max_chance);
        if self.rng.gen::<f64>() >= chance {
            return;
        }
        let chosen = match self
            .pending_injections
            .choose_weighted(&mut self.rng, |injection| injection.weight)
        {
            Ok(injection) => injection.id.clone(),
            Err(_) => return,
        };
        if let Some(index) = self
            .pending_injections
            .iter()
            .position(|injection| injection.id == chosen)
        {
            let injection = self.pending_injections.remove(index);
            tracing::debug!(injection = %injection.id, "injection armed");
            self.active_injection = Some(injection);
        }
    }

    fn execute_action(&mut self, action: OutcomeAction) {
        match action {
            OutcomeAction::End => {}
            OutcomeAction::RemoveMember => {
                if !self.team.is_empty() {
                    let removed = self.team.remove(0);
                    tracing::debug!(member = %removed.name, "team member removed");
                    self.recalculate_team();
                }
            }
            OutcomeAction::ResetTeam => {
                // Stress recovery; no mechanical effect yet.
            }
            OutcomeAction::BoostMorale => {
                self.state.team_score = (self.state.team_score + MORALE_STEP).min(100);
            }
            OutcomeAction::DamageMorale => {
                self.state.team_score = (self.state.team_score - MORALE_STEP).max(0);
            }
            OutcomeAction::DoubleBudget => {
                self.state.budget += self.settings.default_budget / 2;
            }
            OutcomeAction::BurnBudget => {
                self.state.budget = (self.state.budget - self.settings.default_budget / 2).max(0);
            }
        }
    }

    fn recalculate_team(&mut self) {
        self.state.team_totals = Self::totals_of(&self.team);
        self.state.team_score = Self::score_of(&self.state.team_totals, self.team.len());
        self.state.team_size = self.team.len();
    }

    fn totals_of(team: &[Member]) -> SkillTotals {
        let mut totals = SkillTotals::default();
        for member in team {
            totals.add(&member.stats);
        }
        totals
    }

    fn score_of(totals: &SkillTotals, team_size: usize) -> i64 {
        totals.sum() / (4 * team_size.max(1) as i64)
    }

    fn challenge_payload(
        &self,
        id: &str,
        title: &str,
        prompt: &str,
        options: &[OptionDef],
    ) -> Challenge {
        Challenge {
            id: id.to_string(),
            title: title.to_string(),
            prompt: prompt.to_string(),
            options: options
                .iter()
                .map(|option| ChoiceOption {
                    id: option.id.clone(),
                    label: option.label.clone(),
                    narrative: option.narrative.clone(),
                    skill: Some(option.skill),
                    difficulty: Some(option.difficulty),
                    probability: Some(self.chance_percent(option)),
                })
                .collect(),
        }
    }
}
