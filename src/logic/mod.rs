pub mod rules;
pub mod simulation;

pub use rules::{AdvisoryContext, AdvisoryEngine, RuleSetSelection};
pub use simulation::WeatherSimulator;
