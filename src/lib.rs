//! Weather-driven agronomic advisories.
//!
//! The core is two independent rule sets, [`evaluate_crop_based`] and
//! [`evaluate_stage_based`], both pure functions of a [`models::WeatherReading`]
//! and a farm context. Everything else here (config, the SQLite farm
//! registry, the weather simulator, rendering) feeds them or presents their
//! output.

pub mod config;
pub mod db;
pub mod error;
pub mod logic;
pub mod models;
pub mod report;

pub use error::{AgriAdviseError, Result};
pub use logic::rules::{evaluate_crop_based, evaluate_stage_based, AdvisoryRuleSet};
