pub mod loader;
pub mod scenario;
pub mod sim;

pub use scenario::{ChallengeDef, Injection, OptionDef, Outcome, OutcomeAction, ScenarioDef, StageDef};
pub use sim::SimulationEngine;
