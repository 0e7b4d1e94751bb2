use super::{AdvisoryContext, AdvisoryRuleSet};
use crate::error::{AgriAdviseError, Result};
use crate::models::{AdvisoryCategory, AdvisoryMessage, GrowthStage, WeatherReading};

const FERTILIZER_WASH_OFF_RAIN_MM: f64 = 20.0;
const FERTILIZER_DRY_RAIN_MM: f64 = 5.0;
const FERTILIZER_SOIL_MOISTURE_PCT: f64 = 40.0;
const ARMYWORM_TEMP_C: f64 = 28.0;
const ARMYWORM_HUMIDITY_PCT: f64 = 50.0;
const HARVEST_RAIN_MM: f64 = 10.0;

pub const FERTILIZER_WASH_OFF: &str =
    "DO NOT apply fertilizer. Heavy rain (>20mm) will wash it away.";
pub const FERTILIZER_APPLY_NPK: &str = "Good conditions to apply NPK fertilizer today.";
pub const ARMYWORM: &str = "High risk of Armyworm. Scout your field this evening.";
pub const RUSH_HARVEST: &str = "Rush harvest! Rain expected. Cover harvested crops immediately.";
pub const CLEAR_FOR_DRYING: &str = "Weather is clear for drying crops.";

/// Stage-keyed advisories, independent of crop
///
/// Rules, in order:
/// 1. Growing: rain >20mm blocks fertilizer; otherwise rain <5mm with soil
///    moisture >40% is a good NPK window. Missing soil moisture never matches.
/// 2. Any stage: temp >28°C with humidity <50% flags Armyworm.
/// 3. Harvesting: rain >10mm means rush the harvest, otherwise conditions
///    are good for drying.
///
/// There is no all-clear fallback; the result may be empty.
pub fn evaluate_stage_based(weather: &WeatherReading, stage: GrowthStage) -> Vec<AdvisoryMessage> {
    let mut advice = Vec::new();

    if stage == GrowthStage::Growing {
        if weather.rain_forecast_mm > FERTILIZER_WASH_OFF_RAIN_MM {
            advice.push(AdvisoryMessage::critical(
                AdvisoryCategory::Fertilizer,
                FERTILIZER_WASH_OFF,
            ));
        } else if weather.rain_forecast_mm < FERTILIZER_DRY_RAIN_MM
            && weather
                .soil_moisture_pct
                .map_or(false, |m| m > FERTILIZER_SOIL_MOISTURE_PCT)
        {
            advice.push(AdvisoryMessage::info(
                AdvisoryCategory::Fertilizer,
                FERTILIZER_APPLY_NPK,
            ));
        }
    }

    if weather.temperature_c > ARMYWORM_TEMP_C && weather.humidity_pct < ARMYWORM_HUMIDITY_PCT {
        advice.push(AdvisoryMessage::warning(AdvisoryCategory::Pest, ARMYWORM));
    }

    if stage == GrowthStage::Harvesting {
        if weather.rain_forecast_mm > HARVEST_RAIN_MM {
            advice.push(AdvisoryMessage::critical(
                AdvisoryCategory::Harvest,
                RUSH_HARVEST,
            ));
        } else {
            advice.push(AdvisoryMessage::info(
                AdvisoryCategory::Harvest,
                CLEAR_FOR_DRYING,
            ));
        }
    }

    advice
}

pub struct StageBasedRuleSet;

impl AdvisoryRuleSet for StageBasedRuleSet {
    fn id(&self) -> &'static str {
        "stage_based"
    }

    fn name(&self) -> &'static str {
        "Growth-Stage Advisories"
    }

    fn applies(&self, ctx: &AdvisoryContext) -> bool {
        ctx.stage.is_some()
    }

    fn evaluate(
        &self,
        weather: &WeatherReading,
        ctx: &AdvisoryContext,
    ) -> Result<Vec<AdvisoryMessage>> {
        let stage = ctx.stage.ok_or_else(|| {
            AgriAdviseError::InvalidInput("stage-based advice requires a growth stage".into())
        })?;

        Ok(evaluate_stage_based(weather, stage))
    }
}
