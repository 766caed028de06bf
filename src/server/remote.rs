//! HTTP client for a remote scenario server

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::core::error::{Result, SimError};
use crate::core::types::SessionId;
use crate::protocol::{
    DecisionRequest, DecisionResponse, RosterResponse, ScenarioSummary, StartRequest,
    StartResponse,
};
use crate::server::ScenarioServer;

/// Overall per-request timeout. There are no automatic retries: a silently
/// duplicated decision submission is worse than asking the player to retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Scenario server reached over HTTP
pub struct RemoteServer {
    client: Client,
    base_url: String,
}

impl RemoteServer {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SimError::Server(error_text));
        }
        Ok(response)
    }
}

#[async_trait]
impl ScenarioServer for RemoteServer {
    async fn fetch_roster(&self) -> Result<RosterResponse> {
        let response = self
            .client
            .get(format!("{}/api/roster", self.base_url))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>> {
        let response = self
            .client
            .get(format!("{}/api/scenarios", self.base_url))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn start_session(&self, request: &StartRequest) -> Result<StartResponse> {
        let response = self
            .client
            .post(format!("{}/api/session", self.base_url))
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn submit_decision(
        &self,
        session_id: &SessionId,
        request: &DecisionRequest,
    ) -> Result<DecisionResponse> {
        let response = self
            .client
            .post(format!(
                "{}/api/session/{}/decision",
                self.base_url, session_id
            ))
            .json(request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
