use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Option not found: {0}")]
    OptionNotFound(String),

    #[error("No scenario selected")]
    NoScenarioSelected,

    #[error("Team over budget: {cost} > {budget}")]
    TeamOverBudget { cost: u32, budget: u32 },

    #[error("No active session")]
    NoActiveSession,

    #[error("A session is already active")]
    SessionActive,

    #[error("A request is already in flight")]
    RequestInFlight,

    #[error("Malformed scenario: {0}")]
    MalformedScenario(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Data file error: {0}")]
    DataError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
