//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of skills a challenge option can test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Analysis,
    Comms,
    Engineering,
    Leadership,
}

impl Skill {
    pub const ALL: [Skill; 4] = [
        Skill::Analysis,
        Skill::Comms,
        Skill::Engineering,
        Skill::Leadership,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Skill::Analysis => "analysis",
            Skill::Comms => "comms",
            Skill::Engineering => "engineering",
            Skill::Leadership => "leadership",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-member skill levels (0-100 scale)
///
/// Data files may omit individual stats; missing values fall back to the
/// baseline of 50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBlock {
    #[serde(default = "baseline_stat")]
    pub analysis: i64,
    #[serde(default = "baseline_stat")]
    pub comms: i64,
    #[serde(default = "baseline_stat")]
    pub engineering: i64,
    #[serde(default = "baseline_stat")]
    pub leadership: i64,
}

fn baseline_stat() -> i64 {
    50
}

impl Default for SkillBlock {
    fn default() -> Self {
        Self {
            analysis: 50,
            comms: 50,
            engineering: 50,
            leadership: 50,
        }
    }
}

impl SkillBlock {
    pub fn get(&self, skill: Skill) -> i64 {
        match skill {
            Skill::Analysis => self.analysis,
            Skill::Comms => self.comms,
            Skill::Engineering => self.engineering,
            Skill::Leadership => self.leadership,
        }
    }
}

/// Aggregate skill levels across a team
///
/// Unlike [`SkillBlock`], absent values mean "no team data" and deserialize
/// to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTotals {
    #[serde(default)]
    pub analysis: i64,
    #[serde(default)]
    pub comms: i64,
    #[serde(default)]
    pub engineering: i64,
    #[serde(default)]
    pub leadership: i64,
}

impl SkillTotals {
    pub fn get(&self, skill: Skill) -> i64 {
        match skill {
            Skill::Analysis => self.analysis,
            Skill::Comms => self.comms,
            Skill::Engineering => self.engineering,
            Skill::Leadership => self.leadership,
        }
    }

    /// Accumulate one member's stats into the totals
    pub fn add(&mut self, stats: &SkillBlock) {
        self.analysis += stats.analysis;
        self.comms += stats.comms;
        self.engineering += stats.engineering;
        self.leadership += stats.leadership;
    }

    pub fn sum(&self) -> i64 {
        self.analysis + self.comms + self.engineering + self.leadership
    }
}

/// Opaque server-issued session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
