use crate::config::OutputFormat;
use crate::error::Result;
use crate::models::{AdvisoryMessage, AdvisoryReport, WeatherLog, WeatherReading};
use std::fmt::Write;

pub fn render(report: &AdvisoryReport, format: OutputFormat, symbols: bool) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report, symbols)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

pub fn render_text(report: &AdvisoryReport, symbols: bool) -> String {
    let mut out = String::new();

    let mut heading = Vec::new();
    if let Some(farm) = &report.farm {
        heading.push(format!("Farm: {}", farm));
    }
    if let Some(crop) = report.crop {
        heading.push(format!("Crop: {}", crop));
    }
    if let Some(stage) = report.stage {
        heading.push(format!("Stage: {}", stage));
    }
    if !heading.is_empty() {
        let _ = writeln!(out, "{}", heading.join("  "));
    }
    let _ = writeln!(out, "Weather: {}", describe_weather(&report.current_weather));

    for block in &report.advice {
        out.push('\n');
        let _ = writeln!(out, "[{}]", block.rule_set);
        if block.messages.is_empty() {
            out.push_str("  (no advisories)\n");
        }
        for msg in &block.messages {
            let _ = writeln!(out, "  {}", render_message(msg, symbols));
        }
    }

    if let Some(highest) = report.highest_severity() {
        let _ = writeln!(
            out,
            "\n{} message(s), highest severity: {}",
            report.message_count(),
            highest
        );
    }

    out
}

pub fn render_message(msg: &AdvisoryMessage, symbols: bool) -> String {
    if symbols {
        format!("{} {}", msg.severity.symbol(), msg.text)
    } else {
        msg.to_string()
    }
}

pub fn describe_weather(reading: &WeatherReading) -> String {
    let mut s = format!(
        "{:.1}°C, rain {:.1}mm, humidity {:.1}%",
        reading.temperature_c, reading.rain_forecast_mm, reading.humidity_pct
    );
    if let Some(soil) = reading.soil_moisture_pct {
        let _ = write!(s, ", soil moisture {:.1}%", soil);
    }
    s
}

pub fn render_history(logs: &[WeatherLog]) -> String {
    if logs.is_empty() {
        return "No weather readings logged.\n".to_string();
    }

    logs.iter()
        .map(|log| {
            format!(
                "{}  {}\n",
                log.recorded_at.format("%Y-%m-%d %H:%M"),
                describe_weather(&log.reading)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AdvisoryCategory, CropType, GrowthStage, RuleSetAdvice, Severity,
    };

    fn report() -> AdvisoryReport {
        AdvisoryReport {
            farm: Some("Musa Farms".into()),
            crop: Some(CropType::Maize),
            stage: Some(GrowthStage::Planting),
            current_weather: WeatherReading::new(30.0, 25.0, 45.0),
            advice: vec![
                RuleSetAdvice {
                    rule_set: "crop_based".into(),
                    messages: vec![AdvisoryMessage::critical(
                        AdvisoryCategory::Fertilizer,
                        "Do not fertilize.",
                    )],
                },
                RuleSetAdvice {
                    rule_set: "stage_based".into(),
                    messages: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn text_includes_header_and_blocks() {
        let text = render_text(&report(), false);
        assert!(text.starts_with("Farm: Musa Farms  Crop: Maize  Stage: Planting\n"));
        assert!(text.contains("Weather: 30.0°C, rain 25.0mm, humidity 45.0%\n"));
        assert!(text.contains("[crop_based]\n  [Critical] Do not fertilize.\n"));
        assert!(text.contains("[stage_based]\n  (no advisories)\n"));
        assert!(text.ends_with("\n1 message(s), highest severity: Critical\n"));
    }

    #[test]
    fn symbols_replace_severity_tag() {
        let msg = AdvisoryMessage::new(AdvisoryCategory::Harvest, Severity::Critical, "Rush harvest!");
        assert_eq!(render_message(&msg, true), "🔴 Rush harvest!");
        assert_eq!(render_message(&msg, false), "[Critical] Rush harvest!");
    }

    #[test]
    fn weather_description_mentions_soil_only_when_present() {
        let dry = WeatherReading::new(22.0, 0.0, 50.0);
        assert!(!describe_weather(&dry).contains("soil"));
        let moist = dry.with_soil_moisture(41.0);
        assert!(describe_weather(&moist).ends_with("soil moisture 41.0%"));
    }

    #[test]
    fn json_keeps_response_field_names() {
        let json = render(&report(), OutputFormat::Json, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["farm"], "Musa Farms");
        assert_eq!(value["crop"], "Maize");
        assert_eq!(value["stage"], "Planting");
        assert_eq!(value["current_weather"]["rain_forecast_mm"], 25.0);
        assert_eq!(value["advice"][0]["messages"][0]["severity"], "Critical");
    }

    #[test]
    fn empty_history() {
        assert_eq!(render_history(&[]), "No weather readings logged.\n");
    }
}
