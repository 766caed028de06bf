//! Crisis Sim - Interactive Crisis Simulation
//!
//! A budget-constrained team is taken through a scenario session of staged
//! challenges with probabilistic outcomes affecting budget, reputation, and
//! risk. The session model is client/server: the `session` controller talks
//! to a [`server::ScenarioServer`], either a remote engine over HTTP or the
//! in-process `engine`.

pub mod core;
pub mod engine;
pub mod protocol;
pub mod roster;
pub mod server;
pub mod session;
