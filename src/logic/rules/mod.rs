pub mod crop_based;
pub mod engine;
pub mod stage_based;

pub use crop_based::{evaluate_crop_based, CropBasedRuleSet};
pub use engine::{AdvisoryEngine, RuleSetSelection};
pub use stage_based::{evaluate_stage_based, StageBasedRuleSet};

use crate::error::Result;
use crate::models::{AdvisoryMessage, FarmContext, GrowthStage, WeatherReading};

/// Inputs beyond the weather reading. Each rule set reads the part it needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvisoryContext {
    pub farm: Option<FarmContext>,
    pub stage: Option<GrowthStage>,
}

impl AdvisoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_farm(mut self, farm: FarmContext) -> Self {
        self.farm = Some(farm);
        self
    }

    pub fn with_stage(mut self, stage: GrowthStage) -> Self {
        self.stage = Some(stage);
        self
    }
}

/// Trait for advisory rule sets
pub trait AdvisoryRuleSet: Send + Sync {
    /// Unique identifier for this rule set
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Whether the context carries what this rule set needs
    fn applies(&self, ctx: &AdvisoryContext) -> bool;

    /// Evaluate every rule in order. Fails with `InvalidInput` when the
    /// context is missing the farm or stage the rule set is keyed on.
    fn evaluate(
        &self,
        weather: &WeatherReading,
        ctx: &AdvisoryContext,
    ) -> Result<Vec<AdvisoryMessage>>;
}
