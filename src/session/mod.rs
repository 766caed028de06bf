pub mod controller;
pub mod history;
pub mod presenter;
pub mod status;

pub use controller::{DecisionReport, SessionController, SessionPhase};
pub use history::{HistoryEntry, HistoryLedger};
pub use presenter::{ChallengeView, OptionView, StagePresenter, StageView};
pub use status::StatusBoard;
