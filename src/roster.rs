//! Roster model and team composition constraint
//!
//! The roster is loaded once per run and read-only afterwards. Team
//! selection is the only mutable piece; its aggregate cost is checked
//! against the budget ceiling before a session may start.

use std::collections::HashMap;

use crate::protocol::{Member, RosterResponse};

/// Available team members plus the cost ceiling for selections
#[derive(Debug, Clone, Default)]
pub struct Roster {
    budget: u32,
    members: Vec<Member>,
    by_name: HashMap<String, usize>,
}

impl Roster {
    pub fn new(budget: u32, members: Vec<Member>) -> Self {
        let by_name = members
            .iter()
            .enumerate()
            .map(|(index, member)| (member.name.clone(), index))
            .collect();
        Self {
            budget,
            members,
            by_name,
        }
    }

    /// The degraded roster used when loading fails
    pub fn empty() -> Self {
        Self::default()
    }

    /// Cost ceiling for team selections; 0 means unconstrained
    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn get(&self, name: &str) -> Option<&Member> {
        self.by_name.get(name).map(|&index| &self.members[index])
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl From<RosterResponse> for Roster {
    fn from(response: RosterResponse) -> Self {
        Self::new(response.budget, response.members)
    }
}

/// Published cost of the current selection, for the start gate and display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostSummary {
    pub total_cost: u32,
    pub budget: u32,
    pub over_budget: bool,
}

/// The player's current pick of roster members, by name
///
/// Selection order is preserved. Names not present in the roster contribute
/// nothing to the cost and are dropped when the team is resolved.
#[derive(Debug, Clone, Default)]
pub struct TeamSelection {
    selected: Vec<String>,
}

impl TeamSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, name: &str) {
        if !self.contains(name) {
            self.selected.push(name.to_string());
        }
    }

    pub fn deselect(&mut self, name: &str) {
        self.selected.retain(|selected| selected != name);
    }

    /// Flip a member in or out of the selection; returns whether the member
    /// is selected afterwards
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.contains(name) {
            self.deselect(name);
            false
        } else {
            self.select(name);
            true
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.selected.iter().any(|selected| selected == name)
    }

    pub fn names(&self) -> &[String] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Total cost of selected members present in the roster
    pub fn total_cost(&self, roster: &Roster) -> u32 {
        self.selected
            .iter()
            .filter_map(|name| roster.get(name))
            .map(|member| member.cost)
            .sum()
    }

    /// True iff the roster has a ceiling and the selection exceeds it
    pub fn is_over_budget(&self, roster: &Roster) -> bool {
        roster.budget() > 0 && self.total_cost(roster) > roster.budget()
    }

    pub fn summary(&self, roster: &Roster) -> CostSummary {
        let total_cost = self.total_cost(roster);
        CostSummary {
            total_cost,
            budget: roster.budget(),
            over_budget: roster.budget() > 0 && total_cost > roster.budget(),
        }
    }

    /// Resolve the selection to full member records for the start request
    pub fn resolve(&self, roster: &Roster) -> Vec<Member> {
        self.selected
            .iter()
            .filter_map(|name| roster.get(name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn member(name: &str, cost: u32) -> Member {
        Member {
            name: name.to_string(),
            role: "Analyst".to_string(),
            cost,
            stats: Default::default(),
        }
    }

    fn sample_roster() -> Roster {
        Roster::new(100, vec![member("A", 60), member("B", 50)])
    }

    #[test]
    fn test_over_budget_pair_blocked() {
        let roster = sample_roster();
        let mut team = TeamSelection::new();
        team.select("A");
        team.select("B");
        assert_eq!(team.total_cost(&roster), 110);
        assert!(team.is_over_budget(&roster));
    }

    #[test]
    fn test_single_member_within_budget() {
        let roster = sample_roster();
        let mut team = TeamSelection::new();
        team.select("A");
        assert_eq!(team.total_cost(&roster), 60);
        assert!(!team.is_over_budget(&roster));
    }

    #[test]
    fn test_unknown_names_cost_nothing() {
        let roster = sample_roster();
        let mut team = TeamSelection::new();
        team.select("A");
        team.select("ghost");
        assert_eq!(team.total_cost(&roster), 60);
        assert_eq!(team.resolve(&roster).len(), 1);
    }

    #[test]
    fn test_zero_ceiling_is_unconstrained() {
        let roster = Roster::new(0, vec![member("A", 60), member("B", 50)]);
        let mut team = TeamSelection::new();
        team.select("A");
        team.select("B");
        assert!(!team.is_over_budget(&roster));
    }

    #[test]
    fn test_exact_budget_is_allowed() {
        let roster = Roster::new(110, vec![member("A", 60), member("B", 50)]);
        let mut team = TeamSelection::new();
        team.select("A");
        team.select("B");
        assert!(!team.is_over_budget(&roster));
    }

    #[test]
    fn test_toggle_and_duplicate_select() {
        let roster = sample_roster();
        let mut team = TeamSelection::new();
        team.select("A");
        team.select("A");
        assert_eq!(team.len(), 1);
        assert!(!team.toggle("A"));
        assert!(team.is_empty());
        assert_eq!(team.total_cost(&roster), 0);
    }

    proptest! {
        /// is_over_budget == (ceiling > 0 && total > ceiling), for any
        /// roster and any selection over it
        #[test]
        fn prop_over_budget_matches_definition(
            budget in 0u32..400,
            costs in proptest::collection::vec(0u32..150, 0..8),
            picks in proptest::collection::vec(any::<bool>(), 8),
        ) {
            let members: Vec<Member> = costs
                .iter()
                .enumerate()
                .map(|(index, &cost)| member(&format!("m{index}"), cost))
                .collect();
            let roster = Roster::new(budget, members);

            let mut team = TeamSelection::new();
            let mut expected_total = 0u32;
            for (index, (&cost, &picked)) in costs.iter().zip(picks.iter()).enumerate() {
                if picked {
                    team.select(&format!("m{index}"));
                    expected_total += cost;
                }
            }

            prop_assert_eq!(team.total_cost(&roster), expected_total);
            prop_assert_eq!(
                team.is_over_budget(&roster),
                budget > 0 && expected_total > budget
            );
        }
    }
}
