use super::{CropType, GrowthStage, WeatherReading};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvisoryCategory {
    General,
    Fertilizer,
    Pest,
    Disease,
    Drainage,
    Harvest,
}

impl AdvisoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryCategory::General => "General",
            AdvisoryCategory::Fertilizer => "Fertilizer",
            AdvisoryCategory::Pest => "Pest",
            AdvisoryCategory::Disease => "Disease",
            AdvisoryCategory::Drainage => "Drainage",
            AdvisoryCategory::Harvest => "Harvest",
        }
    }
}

impl std::fmt::Display for AdvisoryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Info => "🟢",
            Severity::Warning => "⚠️",
            Severity::Critical => "🔴",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryMessage {
    pub category: AdvisoryCategory,
    pub severity: Severity,
    pub text: String,
}

impl AdvisoryMessage {
    pub fn new(category: AdvisoryCategory, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            category,
            severity,
            text: text.into(),
        }
    }

    pub fn info(category: AdvisoryCategory, text: impl Into<String>) -> Self {
        Self::new(category, Severity::Info, text)
    }

    pub fn warning(category: AdvisoryCategory, text: impl Into<String>) -> Self {
        Self::new(category, Severity::Warning, text)
    }

    pub fn critical(category: AdvisoryCategory, text: impl Into<String>) -> Self {
        Self::new(category, Severity::Critical, text)
    }
}

impl std::fmt::Display for AdvisoryMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.text)
    }
}

/// Output of one rule set, tagged with the rule set that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetAdvice {
    pub rule_set: String,
    pub messages: Vec<AdvisoryMessage>,
}

/// Everything the CLI prints for one advisory request. The JSON form keeps
/// the field names of the old HTTP response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<GrowthStage>,
    pub current_weather: WeatherReading,
    pub advice: Vec<RuleSetAdvice>,
}

impl AdvisoryReport {
    pub fn message_count(&self) -> usize {
        self.advice.iter().map(|a| a.messages.len()).sum()
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.advice
            .iter()
            .flat_map(|a| a.messages.iter())
            .map(|m| m.severity)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn message_display_uses_severity_tag() {
        let msg = AdvisoryMessage::warning(AdvisoryCategory::Disease, "High risk of Rice Blast.");
        assert_eq!(msg.to_string(), "[Warning] High risk of Rice Blast.");
    }

    #[test]
    fn report_highest_severity() {
        let report = AdvisoryReport {
            farm: Some("Delta Rice Fields".into()),
            crop: Some(CropType::Rice),
            stage: None,
            current_weather: WeatherReading::new(25.0, 10.0, 85.0),
            advice: vec![RuleSetAdvice {
                rule_set: "crop_based".into(),
                messages: vec![
                    AdvisoryMessage::info(AdvisoryCategory::General, "header"),
                    AdvisoryMessage::warning(AdvisoryCategory::Disease, "blast"),
                ],
            }],
        };
        assert_eq!(report.message_count(), 2);
        assert_eq!(report.highest_severity(), Some(Severity::Warning));
    }

    #[test]
    fn report_json_omits_missing_stage() {
        let report = AdvisoryReport {
            farm: Some("Musa Farms".into()),
            crop: Some(CropType::Maize),
            stage: None,
            current_weather: WeatherReading::new(25.0, 10.0, 60.0),
            advice: Vec::new(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("stage").is_none());
        assert_eq!(json["crop"], "Maize");
        assert_eq!(json["farm"], "Musa Farms");
    }
}
