use super::{AdvisoryContext, AdvisoryRuleSet};
use crate::error::{AgriAdviseError, Result};
use crate::models::{
    AdvisoryCategory, AdvisoryMessage, CropType, FarmContext, WeatherReading,
};

const MAIZE_WASH_OFF_RAIN_MM: f64 = 20.0;
const ARMYWORM_TEMP_C: f64 = 28.0;
const ARMYWORM_HUMIDITY_PCT: f64 = 50.0;
const RICE_BLAST_HUMIDITY_PCT: f64 = 80.0;
const CASSAVA_WATERLOGGING_RAIN_MM: f64 = 50.0;

pub const MAIZE_WASH_OFF: &str =
    "Heavy rain (>20mm) detected. Do NOT apply fertilizer today to avoid wash-off.";
pub const FALL_ARMYWORM: &str = "High risk of Fall Armyworm. Conditions (Temp > 28°C, \
     Humidity < 50%) are favorable. Scout field immediately.";
pub const RICE_BLAST: &str =
    "High humidity (>80%) detected. High risk of Rice Blast disease. Monitor crop closely.";
pub const CASSAVA_WATERLOGGING: &str = "Excessive rainfall (>50mm). Risk of root rot and \
     waterlogging. Ensure drainage channels are clear.";
pub const CONDITIONS_NORMAL: &str = "Conditions look normal. No specific alerts.";

/// Crop-keyed advisories
///
/// Always opens with a header naming crop and owner, then applies the rules
/// for the farm's crop:
/// - Maize: rain >20mm blocks fertilizer; temp >28°C with humidity <50% flags Fall Armyworm
/// - Rice: humidity >80% flags Rice Blast
/// - Cassava: rain >50mm flags root rot and waterlogging
///
/// If only the header was produced, an all-clear message is appended, so the
/// result always holds at least two entries.
pub fn evaluate_crop_based(weather: &WeatherReading, farm: &FarmContext) -> Vec<AdvisoryMessage> {
    let mut advice = vec![AdvisoryMessage::info(
        AdvisoryCategory::General,
        format!("Analyzing for {} at {}...", farm.crop_type, farm.owner_label),
    )];

    match farm.crop_type {
        CropType::Maize => {
            if weather.rain_forecast_mm > MAIZE_WASH_OFF_RAIN_MM {
                advice.push(AdvisoryMessage::critical(
                    AdvisoryCategory::Fertilizer,
                    MAIZE_WASH_OFF,
                ));
            }
            if weather.temperature_c > ARMYWORM_TEMP_C
                && weather.humidity_pct < ARMYWORM_HUMIDITY_PCT
            {
                advice.push(AdvisoryMessage::warning(
                    AdvisoryCategory::Pest,
                    FALL_ARMYWORM,
                ));
            }
        }
        CropType::Rice => {
            if weather.humidity_pct > RICE_BLAST_HUMIDITY_PCT {
                advice.push(AdvisoryMessage::warning(
                    AdvisoryCategory::Disease,
                    RICE_BLAST,
                ));
            }
        }
        CropType::Cassava => {
            if weather.rain_forecast_mm > CASSAVA_WATERLOGGING_RAIN_MM {
                advice.push(AdvisoryMessage::critical(
                    AdvisoryCategory::Drainage,
                    CASSAVA_WATERLOGGING,
                ));
            }
        }
    }

    // Only the header so far
    if advice.len() == 1 {
        advice.push(AdvisoryMessage::info(
            AdvisoryCategory::General,
            CONDITIONS_NORMAL,
        ));
    }

    advice
}

pub struct CropBasedRuleSet;

impl AdvisoryRuleSet for CropBasedRuleSet {
    fn id(&self) -> &'static str {
        "crop_based"
    }

    fn name(&self) -> &'static str {
        "Crop-Based Advisories"
    }

    fn applies(&self, ctx: &AdvisoryContext) -> bool {
        ctx.farm.is_some()
    }

    fn evaluate(
        &self,
        weather: &WeatherReading,
        ctx: &AdvisoryContext,
    ) -> Result<Vec<AdvisoryMessage>> {
        let farm = ctx.farm.as_ref().ok_or_else(|| {
            AgriAdviseError::InvalidInput("crop-based advice requires a farm context".into())
        })?;

        Ok(evaluate_crop_based(weather, farm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    fn farm(crop: CropType) -> FarmContext {
        FarmContext::new("Musa Farms", crop)
    }

    fn texts(advice: &[AdvisoryMessage]) -> Vec<&str> {
        advice.iter().map(|m| m.text.as_str()).collect()
    }

    #[test]
    fn header_is_always_first() {
        for crop in CropType::all() {
            for weather in [
                WeatherReading::new(20.0, 0.0, 30.0),
                WeatherReading::new(35.0, 60.0, 90.0),
                WeatherReading::new(30.0, 25.0, 45.0),
            ] {
                let advice = evaluate_crop_based(&weather, &farm(*crop));
                assert!(advice.len() >= 2);
                assert_eq!(advice[0].severity, Severity::Info);
                assert_eq!(advice[0].category, AdvisoryCategory::General);
                assert_eq!(
                    advice[0].text,
                    format!("Analyzing for {} at Musa Farms...", crop)
                );
            }
        }
    }

    #[test]
    fn normal_conditions_yield_header_and_all_clear() {
        let weather = WeatherReading::new(25.0, 10.0, 60.0);
        for crop in CropType::all() {
            let advice = evaluate_crop_based(&weather, &farm(*crop));
            assert_eq!(advice.len(), 2);
            assert_eq!(advice[1].severity, Severity::Info);
            assert_eq!(advice[1].text, CONDITIONS_NORMAL);
        }
    }

    #[test]
    fn maize_wash_off_boundary() {
        let at = evaluate_crop_based(&WeatherReading::new(25.0, 20.0, 60.0), &farm(CropType::Maize));
        assert_eq!(texts(&at)[1], CONDITIONS_NORMAL);

        let over = evaluate_crop_based(&WeatherReading::new(25.0, 20.1, 60.0), &farm(CropType::Maize));
        assert_eq!(over.len(), 2);
        assert_eq!(over[1].severity, Severity::Critical);
        assert_eq!(over[1].category, AdvisoryCategory::Fertilizer);
        assert_eq!(over[1].text, MAIZE_WASH_OFF);
    }

    #[test]
    fn maize_fall_armyworm_boundaries() {
        let maize = farm(CropType::Maize);

        let hit = evaluate_crop_based(&WeatherReading::new(28.1, 0.0, 49.9), &maize);
        assert_eq!(hit[1].text, FALL_ARMYWORM);
        assert_eq!(hit[1].severity, Severity::Warning);

        let temp_at = evaluate_crop_based(&WeatherReading::new(28.0, 0.0, 40.0), &maize);
        assert_eq!(texts(&temp_at), vec![temp_at[0].text.as_str(), CONDITIONS_NORMAL]);

        let humidity_at = evaluate_crop_based(&WeatherReading::new(32.0, 0.0, 50.0), &maize);
        assert_eq!(humidity_at[1].text, CONDITIONS_NORMAL);
    }

    #[test]
    fn maize_rules_fire_independently_in_order() {
        let advice = evaluate_crop_based(&WeatherReading::new(30.0, 25.0, 45.0), &farm(CropType::Maize));
        assert_eq!(advice.len(), 3);
        assert_eq!(advice[1].text, MAIZE_WASH_OFF);
        assert_eq!(advice[2].text, FALL_ARMYWORM);
        assert!(!texts(&advice).contains(&CONDITIONS_NORMAL));
    }

    #[test]
    fn rice_blast_boundary() {
        let rice = farm(CropType::Rice);

        let at = evaluate_crop_based(&WeatherReading::new(25.0, 0.0, 80.0), &rice);
        assert_eq!(at[1].text, CONDITIONS_NORMAL);

        let over = evaluate_crop_based(&WeatherReading::new(25.0, 0.0, 80.1), &rice);
        assert_eq!(over.len(), 2);
        assert_eq!(over[1].text, RICE_BLAST);
        assert_eq!(over[1].category, AdvisoryCategory::Disease);
    }

    #[test]
    fn rice_ignores_maize_conditions() {
        let advice = evaluate_crop_based(&WeatherReading::new(30.0, 40.0, 45.0), &farm(CropType::Rice));
        assert_eq!(advice.len(), 2);
        assert_eq!(advice[1].text, CONDITIONS_NORMAL);
    }

    #[test]
    fn cassava_waterlogging_boundary() {
        let cassava = farm(CropType::Cassava);

        let at = evaluate_crop_based(&WeatherReading::new(25.0, 50.0, 60.0), &cassava);
        assert_eq!(at[1].text, CONDITIONS_NORMAL);

        let over = evaluate_crop_based(&WeatherReading::new(25.0, 50.1, 60.0), &cassava);
        assert_eq!(over[1].severity, Severity::Critical);
        assert_eq!(over[1].category, AdvisoryCategory::Drainage);
        assert_eq!(over[1].text, CASSAVA_WATERLOGGING);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let weather = WeatherReading::new(31.2, 22.4, 41.0);
        let maize = farm(CropType::Maize);
        assert_eq!(
            evaluate_crop_based(&weather, &maize),
            evaluate_crop_based(&weather, &maize)
        );
    }

    #[test]
    fn rule_set_requires_farm_context() {
        let weather = WeatherReading::new(25.0, 0.0, 60.0);
        let err = CropBasedRuleSet
            .evaluate(&weather, &AdvisoryContext::new())
            .unwrap_err();
        assert!(matches!(err, AgriAdviseError::InvalidInput(_)));

        let ctx = AdvisoryContext::new().with_farm(farm(CropType::Rice));
        assert!(CropBasedRuleSet.applies(&ctx));
        assert_eq!(
            CropBasedRuleSet.evaluate(&weather, &ctx).unwrap(),
            evaluate_crop_based(&weather, &farm(CropType::Rice))
        );
    }
}
