//! Latest simulation readout as published by the server

use crate::core::types::SkillTotals;
use crate::protocol::StateSnapshot;

/// Budget, reputation, risk, and team skill totals
///
/// Replaced wholesale from every successful server response. All the
/// simulation math happens server-side; nothing here is ever adjusted
/// incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusBoard {
    pub budget: i64,
    pub reputation: i64,
    pub risk: i64,
    pub team_totals: SkillTotals,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full readout from a response snapshot
    pub fn replace_from(&mut self, state: &StateSnapshot) {
        self.budget = state.budget;
        self.reputation = state.reputation;
        self.risk = state.risk;
        self.team_totals = state.team_totals;
    }
}
