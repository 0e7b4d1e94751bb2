use super::{
    crop_based::CropBasedRuleSet, stage_based::StageBasedRuleSet, AdvisoryContext,
    AdvisoryRuleSet,
};
use crate::error::{AgriAdviseError, Result};
use crate::models::{AdvisoryMessage, RuleSetAdvice, WeatherReading};
use serde::{Deserialize, Serialize};

/// Which rule sets a caller wants run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSetSelection {
    Crop,
    Stage,
    #[default]
    All,
}

impl RuleSetSelection {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "crop" | "crop_based" | "crop-based" => Some(RuleSetSelection::Crop),
            "stage" | "stage_based" | "stage-based" => Some(RuleSetSelection::Stage),
            "all" | "both" => Some(RuleSetSelection::All),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| {
            AgriAdviseError::InvalidInput(format!(
                "unknown rule set '{}' (expected crop, stage or all)",
                s
            ))
        })
    }

    fn rule_set_id(&self) -> Option<&'static str> {
        match self {
            RuleSetSelection::Crop => Some("crop_based"),
            RuleSetSelection::Stage => Some("stage_based"),
            RuleSetSelection::All => None,
        }
    }
}

pub struct AdvisoryEngine {
    rule_sets: Vec<Box<dyn AdvisoryRuleSet>>,
}

impl AdvisoryEngine {
    pub fn new() -> Self {
        let rule_sets: Vec<Box<dyn AdvisoryRuleSet>> =
            vec![Box::new(CropBasedRuleSet), Box::new(StageBasedRuleSet)];

        Self { rule_sets }
    }

    /// Runs every rule set the context supports, in registration order.
    pub fn evaluate(
        &self,
        weather: &WeatherReading,
        ctx: &AdvisoryContext,
    ) -> Result<Vec<RuleSetAdvice>> {
        let advice: Vec<RuleSetAdvice> = self
            .rule_sets
            .iter()
            .filter(|rs| rs.applies(ctx))
            .map(|rs| -> Result<RuleSetAdvice> {
                Ok(RuleSetAdvice {
                    rule_set: rs.id().to_string(),
                    messages: rs.evaluate(weather, ctx)?,
                })
            })
            .collect::<Result<_>>()?;

        if advice.is_empty() {
            return Err(AgriAdviseError::InvalidInput(
                "no rule set applies: supply a farm, a growth stage, or both".into(),
            ));
        }

        tracing::debug!(
            rule_sets = advice.len(),
            messages = advice.iter().map(|a| a.messages.len()).sum::<usize>(),
            "Evaluated advisories"
        );

        Ok(advice)
    }

    pub fn evaluate_rule_set(
        &self,
        rule_set_id: &str,
        weather: &WeatherReading,
        ctx: &AdvisoryContext,
    ) -> Result<Vec<AdvisoryMessage>> {
        self.rule_sets
            .iter()
            .find(|rs| rs.id() == rule_set_id)
            .ok_or_else(|| AgriAdviseError::NotFound(format!("rule set '{}'", rule_set_id)))?
            .evaluate(weather, ctx)
    }

    pub fn evaluate_selected(
        &self,
        selection: RuleSetSelection,
        weather: &WeatherReading,
        ctx: &AdvisoryContext,
    ) -> Result<Vec<RuleSetAdvice>> {
        match selection.rule_set_id() {
            Some(id) => Ok(vec![RuleSetAdvice {
                rule_set: id.to_string(),
                messages: self.evaluate_rule_set(id, weather, ctx)?,
            }]),
            None => self.evaluate(weather, ctx),
        }
    }

    pub fn list_rule_sets(&self) -> Vec<(&'static str, &'static str)> {
        self.rule_sets.iter().map(|rs| (rs.id(), rs.name())).collect()
    }
}

impl Default for AdvisoryEngine {
    fn default() -> Self {
        Self::new()
    }
}
