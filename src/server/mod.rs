//! The scenario server as seen by the session controller
//!
//! The controller only ever talks through [`ScenarioServer`]; whether the
//! engine runs in-process or behind HTTP is an implementation detail.

pub mod local;
pub mod remote;

pub use local::LocalServer;
pub use remote::RemoteServer;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::types::SessionId;
use crate::protocol::{
    DecisionRequest, DecisionResponse, RosterResponse, ScenarioSummary, StartRequest,
    StartResponse,
};

#[async_trait]
pub trait ScenarioServer: Send + Sync {
    /// Available team members and the composition budget
    async fn fetch_roster(&self) -> Result<RosterResponse>;

    /// Scenarios that can be started
    async fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>>;

    /// Start a session; a non-success result issues no identifier
    async fn start_session(&self, request: &StartRequest) -> Result<StartResponse>;

    /// Apply one decision under an active session identifier
    async fn submit_decision(
        &self,
        session_id: &SessionId,
        request: &DecisionRequest,
    ) -> Result<DecisionResponse>;
}
