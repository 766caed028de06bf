//! Simulation tuning constants
//!
//! All magic numbers for the engine are collected here with explanations of
//! their purpose. Settings are passed explicitly to the components that need
//! them rather than read from ambient globals.

/// Runtime configuration for the simulation engine
///
/// These values have been tuned to produce sessions that end in roughly ten
/// decisions with meaningful budget pressure. Changing them affects pacing.
#[derive(Debug, Clone)]
pub struct SimulationSettings {
    /// Hard cap on scheduled decision rounds before a session ends
    ///
    /// Injections do not count toward the cap; only planned challenges do.
    pub max_rounds: u32,

    /// Operating budget a new session starts with
    ///
    /// Also the reference amount for the double-budget and burn-budget
    /// outcome actions, which grant or remove half of it.
    pub default_budget: i64,

    /// Reputation a new session starts with
    pub base_reputation: i64,

    /// Baseline chance an injection fires after a scheduled decision
    pub injection_base_chance: f64,

    /// Additional injection chance per point of current risk
    ///
    /// At the default (0.005), a session at risk 100 adds 0.5 on top of the
    /// baseline, so high-risk play makes disruptions much more likely.
    pub injection_risk_factor: f64,

    /// Ceiling on the computed injection chance
    pub injection_max_chance: f64,

    /// Cost ceiling for team composition
    ///
    /// A ceiling of 0 disables the constraint entirely.
    pub team_budget: u32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            default_budget: 100,
            base_reputation: 70,
            injection_base_chance: 0.15,
            injection_risk_factor: 0.005,
            injection_max_chance: 0.7,
            team_budget: 200,
        }
    }
}

impl SimulationSettings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rounds == 0 {
            return Err("max_rounds must be at least 1".into());
        }

        if self.injection_base_chance > self.injection_max_chance {
            return Err(format!(
                "injection_base_chance ({}) should be <= injection_max_chance ({})",
                self.injection_base_chance, self.injection_max_chance
            ));
        }

        if !(0.0..=1.0).contains(&self.injection_max_chance) {
            return Err(format!(
                "injection_max_chance ({}) must be a probability in [0, 1]",
                self.injection_max_chance
            ));
        }

        if self.injection_risk_factor < 0.0 {
            return Err("injection_risk_factor must be non-negative".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(SimulationSettings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let settings = SimulationSettings {
            max_rounds: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_chance_ordering_enforced() {
        let settings = SimulationSettings {
            injection_base_chance: 0.9,
            injection_max_chance: 0.7,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
