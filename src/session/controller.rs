//! Session lifecycle and the decision round-trip state machine
//!
//! The controller owns the session identifier and the latest published
//! state. One start or decision call may be in flight at a time; the guard
//! lives in the phase field here, not in whatever front-end drives it.
//!
//! Round-trips split into a synchronous begin/complete/fail triple so the
//! guard is testable without a transport, plus async wrappers that drive a
//! [`ScenarioServer`].

use crate::core::error::{Result, SimError};
use crate::core::types::SessionId;
use crate::protocol::{DecisionRequest, DecisionResponse, StartRequest, StartResponse};
use crate::roster::{Roster, TeamSelection};
use crate::server::ScenarioServer;
use crate::session::history::HistoryLedger;
use crate::session::presenter::StagePresenter;
use crate::session::status::StatusBoard;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session; roster editable
    Idle,
    /// Start request in flight
    Starting,
    /// Session live, awaiting a player selection
    Active,
    /// Decision request in flight
    AwaitingDecision,
    /// Terminal result received; behaves as Idle for the next start
    Finished,
}

/// What a completed decision round-trip reports back to the front-end
#[derive(Debug, Clone)]
pub struct DecisionReport {
    pub finished: bool,
    pub outcome: Option<String>,
    pub success: Option<bool>,
}

/// Owns session identity, lifecycle, and the latest published snapshot
///
/// Other components read the published state through accessors; nothing
/// else may mutate it.
#[derive(Debug, Default)]
pub struct SessionController {
    phase: SessionPhase,
    session_id: Option<SessionId>,
    roster_locked: bool,
    status: StatusBoard,
    ledger: HistoryLedger,
    presenter: StagePresenter,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Idle
    }
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// True while a session is live; selection edits must be refused
    pub fn roster_locked(&self) -> bool {
        self.roster_locked
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn presenter(&self) -> &StagePresenter {
        &self.presenter
    }

    /// Validate preconditions and claim the in-flight slot for a start call
    ///
    /// Rejections happen before any network call is issued: an empty
    /// scenario id or an over-budget team never leaves the client.
    pub fn begin_start(
        &mut self,
        scenario_id: &str,
        team: &TeamSelection,
        roster: &Roster,
    ) -> Result<StartRequest> {
        match self.phase {
            SessionPhase::Idle | SessionPhase::Finished => {}
            SessionPhase::Starting | SessionPhase::AwaitingDecision => {
                return Err(SimError::RequestInFlight)
            }
            SessionPhase::Active => return Err(SimError::SessionActive),
        }

        if scenario_id.is_empty() {
            return Err(SimError::NoScenarioSelected);
        }
        let summary = team.summary(roster);
        if summary.over_budget {
            return Err(SimError::TeamOverBudget {
                cost: summary.total_cost,
                budget: summary.budget,
            });
        }

        self.phase = SessionPhase::Starting;
        Ok(StartRequest {
            scenario_id: scenario_id.to_string(),
            team: team.resolve(roster),
        })
    }

    /// Apply a successful start response
    pub fn complete_start(&mut self, response: StartResponse) {
        tracing::info!(session = %response.session_id, "session started");
        self.session_id = Some(response.session_id);
        self.status.replace_from(&response.state);
        self.ledger.clear();
        self.presenter.show(&response.stage);
        self.roster_locked = true;
        self.phase = SessionPhase::Active;
    }

    /// Roll back a failed start; no identifier was issued and the roster
    /// stays editable
    pub fn fail_start(&mut self) {
        self.phase = SessionPhase::Idle;
    }

    /// Validate preconditions and claim the in-flight slot for a decision
    ///
    /// A second call while one is outstanding is rejected here, regardless
    /// of whether the presentation disabled its inputs.
    pub fn begin_decision(&mut self, option_id: &str) -> Result<(SessionId, DecisionRequest)> {
        match self.phase {
            SessionPhase::Active => {}
            SessionPhase::Starting | SessionPhase::AwaitingDecision => {
                return Err(SimError::RequestInFlight)
            }
            SessionPhase::Idle | SessionPhase::Finished => return Err(SimError::NoActiveSession),
        }
        let session_id = self
            .session_id
            .clone()
            .ok_or(SimError::NoActiveSession)?;

        self.phase = SessionPhase::AwaitingDecision;
        self.presenter.set_inputs_enabled(false);
        Ok((
            session_id,
            DecisionRequest {
                option_id: option_id.to_string(),
            },
        ))
    }

    /// Apply a successful decision response
    pub fn complete_decision(&mut self, response: DecisionResponse) -> DecisionReport {
        self.status.replace_from(&response.state);
        self.ledger.record_latest(&response.state);

        if response.finished {
            tracing::info!("session finished");
            self.session_id = None;
            self.roster_locked = false;
            self.presenter.clear();
            self.phase = SessionPhase::Finished;
        } else {
            match &response.stage {
                Some(stage) => self.presenter.show(stage),
                // A successful response without a stage is a defined empty
                // state, not an error.
                None => self.presenter.clear(),
            }
            self.phase = SessionPhase::Active;
        }

        DecisionReport {
            finished: response.finished,
            outcome: response.outcome,
            success: response.success,
        }
    }

    /// Roll back a failed decision; the session and current stage survive
    /// and inputs are re-enabled for a retry
    pub fn fail_decision(&mut self) {
        self.presenter.set_inputs_enabled(true);
        self.phase = SessionPhase::Active;
    }

    /// Drop all session state and return to Idle
    pub fn reset(&mut self) {
        self.phase = SessionPhase::Idle;
        self.session_id = None;
        self.roster_locked = false;
        self.status = StatusBoard::new();
        self.ledger.clear();
        self.presenter.clear();
    }

    /// Full start round-trip against a server
    pub async fn start<S: ScenarioServer + ?Sized>(
        &mut self,
        server: &S,
        scenario_id: &str,
        team: &TeamSelection,
        roster: &Roster,
    ) -> Result<()> {
        let request = self.begin_start(scenario_id, team, roster)?;
        match server.start_session(&request).await {
            Ok(response) => {
                self.complete_start(response);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "session start failed");
                self.fail_start();
                Err(err)
            }
        }
    }

    /// Full decision round-trip against a server
    pub async fn submit_decision<S: ScenarioServer + ?Sized>(
        &mut self,
        server: &S,
        option_id: &str,
    ) -> Result<DecisionReport> {
        let (session_id, request) = self.begin_decision(option_id)?;
        match server.submit_decision(&session_id, &request).await {
            Ok(response) => Ok(self.complete_decision(response)),
            Err(err) => {
                tracing::warn!(error = %err, "decision failed");
                self.fail_decision();
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Member, StateSnapshot};

    fn roster() -> Roster {
        let members = vec![
            Member {
                name: "A".into(),
                role: "Analyst".into(),
                cost: 60,
                stats: Default::default(),
            },
            Member {
                name: "B".into(),
                role: "Engineer".into(),
                cost: 50,
                stats: Default::default(),
            },
        ];
        Roster::new(100, members)
    }

    fn team_of(names: &[&str]) -> TeamSelection {
        let mut team = TeamSelection::new();
        for name in names {
            team.select(name);
        }
        team
    }

    fn snapshot() -> StateSnapshot {
        serde_json::from_str(r#"{"budget": 100, "reputation": 70, "risk": 50}"#).unwrap()
    }

    fn start_response() -> StartResponse {
        StartResponse {
            session_id: SessionId("s1".into()),
            state: snapshot(),
            stage: serde_json::from_str(
                r#"{"id": "s1", "title": "Stage 1", "summary": "",
                    "challenges": [{"id": "c1", "title": "C1", "prompt": "",
                                    "options": [{"id": "O1", "label": "Act"}]}]}"#,
            )
            .unwrap(),
        }
    }

    fn finished_response() -> DecisionResponse {
        let mut state = snapshot();
        state.budget = 95;
        state.history = vec![crate::protocol::HistoryRecord {
            stage: "s1".into(),
            challenge: "c1".into(),
            option: "Act".into(),
            outcome: "done".into(),
        }];
        DecisionResponse {
            state,
            stage: None,
            finished: true,
            round: 1,
            outcome: Some("done".into()),
            success: Some(true),
        }
    }

    #[test]
    fn test_begin_start_rejects_over_budget_team() {
        let mut controller = SessionController::new();
        let err = controller
            .begin_start("breach", &team_of(&["A", "B"]), &roster())
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::TeamOverBudget {
                cost: 110,
                budget: 100
            }
        ));
        // Rejected before the in-flight slot was claimed.
        assert_eq!(controller.phase(), SessionPhase::Idle);
        assert!(!controller.roster_locked());
    }

    #[test]
    fn test_begin_start_rejects_empty_scenario() {
        let mut controller = SessionController::new();
        let err = controller
            .begin_start("", &team_of(&["A"]), &roster())
            .unwrap_err();
        assert!(matches!(err, SimError::NoScenarioSelected));
    }

    #[test]
    fn test_start_locks_roster_and_clears_ledger() {
        let mut controller = SessionController::new();
        let request = controller
            .begin_start("breach", &team_of(&["A"]), &roster())
            .unwrap();
        assert_eq!(request.team.len(), 1);
        assert_eq!(controller.phase(), SessionPhase::Starting);

        controller.complete_start(start_response());
        assert_eq!(controller.phase(), SessionPhase::Active);
        assert_eq!(controller.session_id().unwrap().0, "s1");
        assert!(controller.roster_locked());
        assert!(controller.ledger().is_empty());
        assert!(controller.presenter().view().is_some());
    }

    #[test]
    fn test_failed_start_returns_to_idle() {
        let mut controller = SessionController::new();
        controller
            .begin_start("breach", &team_of(&["A"]), &roster())
            .unwrap();
        controller.fail_start();
        assert_eq!(controller.phase(), SessionPhase::Idle);
        assert!(controller.session_id().is_none());
        assert!(!controller.roster_locked());
    }

    #[test]
    fn test_second_begin_while_starting_is_rejected() {
        let mut controller = SessionController::new();
        controller
            .begin_start("breach", &team_of(&["A"]), &roster())
            .unwrap();
        let err = controller
            .begin_start("breach", &team_of(&["A"]), &roster())
            .unwrap_err();
        assert!(matches!(err, SimError::RequestInFlight));
    }

    #[test]
    fn test_decision_requires_active_session() {
        let mut controller = SessionController::new();
        let err = controller.begin_decision("O1").unwrap_err();
        assert!(matches!(err, SimError::NoActiveSession));
    }

    #[test]
    fn test_duplicate_decision_is_rejected() {
        let mut controller = SessionController::new();
        controller
            .begin_start("breach", &team_of(&["A"]), &roster())
            .unwrap();
        controller.complete_start(start_response());

        let (session_id, _request) = controller.begin_decision("O1").unwrap();
        assert_eq!(session_id.0, "s1");
        assert_eq!(controller.phase(), SessionPhase::AwaitingDecision);
        assert!(!controller.presenter().inputs_enabled());

        // Second submission before the first resolves: guarded by phase.
        let err = controller.begin_decision("O1").unwrap_err();
        assert!(matches!(err, SimError::RequestInFlight));
    }

    #[test]
    fn test_finished_decision_clears_session() {
        let mut controller = SessionController::new();
        controller
            .begin_start("breach", &team_of(&["A"]), &roster())
            .unwrap();
        controller.complete_start(start_response());
        controller.begin_decision("O1").unwrap();

        let report = controller.complete_decision(finished_response());
        assert!(report.finished);
        assert_eq!(controller.phase(), SessionPhase::Finished);
        assert!(controller.session_id().is_none());
        assert!(!controller.roster_locked());
        assert_eq!(controller.ledger().len(), 1);
        assert_eq!(controller.status().budget, 95);
        assert!(controller.presenter().view().is_none());
    }

    #[test]
    fn test_failed_decision_preserves_session() {
        let mut controller = SessionController::new();
        controller
            .begin_start("breach", &team_of(&["A"]), &roster())
            .unwrap();
        controller.complete_start(start_response());
        controller.begin_decision("O1").unwrap();

        controller.fail_decision();
        assert_eq!(controller.phase(), SessionPhase::Active);
        assert_eq!(controller.session_id().unwrap().0, "s1");
        assert!(controller.presenter().inputs_enabled());
        assert!(controller.ledger().is_empty());
    }

    #[test]
    fn test_start_allowed_again_after_finish() {
        let mut controller = SessionController::new();
        controller
            .begin_start("breach", &team_of(&["A"]), &roster())
            .unwrap();
        controller.complete_start(start_response());
        controller.begin_decision("O1").unwrap();
        controller.complete_decision(finished_response());

        assert!(controller
            .begin_start("breach", &team_of(&["B"]), &roster())
            .is_ok());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut controller = SessionController::new();
        controller
            .begin_start("breach", &team_of(&["A"]), &roster())
            .unwrap();
        controller.complete_start(start_response());

        controller.reset();
        assert_eq!(controller.phase(), SessionPhase::Idle);
        assert!(controller.session_id().is_none());
        assert!(!controller.roster_locked());
        assert!(controller.presenter().view().is_none());
    }
}
