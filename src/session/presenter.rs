//! Stage presentation: resolved views over the raw stage payload
//!
//! Optional option fields are resolved into display defaults once, here.
//! The decision payload always carries the raw option id; defaults never
//! leak back to the server.

use crate::core::types::Skill;
use crate::protocol::{Challenge, ChoiceOption, Stage};

/// Skill shown when the server sent none
pub const DEFAULT_SKILL: Skill = Skill::Analysis;

/// Difficulty shown when the server sent none
pub const DEFAULT_DIFFICULTY: i64 = 50;

/// Placeholder shown when no stage is available
pub const EMPTY_PLACEHOLDER: &str = "No stage available.";

/// Placeholder shown after a terminal decision
pub const FINISHED_PLACEHOLDER: &str = "Simulation complete. Start a new session to replay.";

/// An option with display fallbacks already applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub id: String,
    pub label: String,
    pub narrative: String,
    pub skill: Skill,
    pub difficulty: i64,
    pub probability: Option<i64>,
}

impl OptionView {
    fn resolve(raw: &ChoiceOption) -> Self {
        Self {
            id: raw.id.clone(),
            label: raw.label.clone(),
            narrative: raw.narrative.clone(),
            skill: raw.skill.unwrap_or(DEFAULT_SKILL),
            difficulty: raw.difficulty.unwrap_or(DEFAULT_DIFFICULTY),
            probability: raw.probability,
        }
    }

    /// "63%" for a known probability, "?%" when the server sent none
    pub fn probability_label(&self) -> String {
        match self.probability {
            Some(percent) => format!("{percent}%"),
            None => "?%".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeView {
    pub title: String,
    pub prompt: String,
    pub options: Vec<OptionView>,
}

/// A stage resolved for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageView {
    pub title: String,
    pub summary: String,
    pub is_injection: bool,
    pub challenges: Vec<ChallengeView>,
}

impl StageView {
    pub fn resolve(stage: &Stage) -> Self {
        Self {
            title: stage.title.clone(),
            summary: stage.summary.clone(),
            is_injection: stage.is_injection,
            challenges: stage.challenges.iter().map(ChallengeView::resolve).collect(),
        }
    }
}

impl ChallengeView {
    fn resolve(challenge: &Challenge) -> Self {
        Self {
            title: challenge.title.clone(),
            prompt: challenge.prompt.clone(),
            options: challenge.options.iter().map(OptionView::resolve).collect(),
        }
    }
}

/// What the player currently sees: a resolved stage, or explicitly nothing
///
/// Holds the input-enable flag the controller flips around decision
/// round-trips. The flag is display state only; re-entrancy is guarded by
/// the controller's phase, not here.
#[derive(Debug, Clone, Default)]
pub struct StagePresenter {
    view: Option<StageView>,
    inputs_enabled: bool,
}

impl StagePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the presented stage and re-enable inputs
    pub fn show(&mut self, stage: &Stage) {
        self.view = Some(StageView::resolve(stage));
        self.inputs_enabled = true;
    }

    /// Drop the presented stage, entering the explicit empty state
    pub fn clear(&mut self) {
        self.view = None;
        self.inputs_enabled = false;
    }

    pub fn view(&self) -> Option<&StageView> {
        self.view.as_ref()
    }

    pub fn set_inputs_enabled(&mut self, enabled: bool) {
        self.inputs_enabled = enabled;
    }

    pub fn inputs_enabled(&self) -> bool {
        self.inputs_enabled
    }

    /// Resolve a selection to exactly one presented option
    pub fn find_option(&self, option_id: &str) -> Option<&OptionView> {
        self.view
            .as_ref()?
            .challenges
            .iter()
            .flat_map(|challenge| challenge.options.iter())
            .find(|option| option.id == option_id)
    }
}
