use crate::error::{AgriAdviseError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single weather observation or short-range forecast used as rule input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub rain_forecast_mm: f64,
    pub humidity_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_moisture_pct: Option<f64>,
}

impl WeatherReading {
    pub fn new(temperature_c: f64, rain_forecast_mm: f64, humidity_pct: f64) -> Self {
        Self {
            temperature_c,
            rain_forecast_mm,
            humidity_pct,
            soil_moisture_pct: None,
        }
    }

    pub fn with_soil_moisture(mut self, soil_moisture_pct: f64) -> Self {
        self.soil_moisture_pct = Some(soil_moisture_pct);
        self
    }

    /// Rejects NaN and infinite values. Range checks are left to the source;
    /// the rules compare the raw numbers.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("temperature_c", Some(self.temperature_c)),
            ("rain_forecast_mm", Some(self.rain_forecast_mm)),
            ("humidity_pct", Some(self.humidity_pct)),
            ("soil_moisture_pct", self.soil_moisture_pct),
        ];

        for (name, value) in fields {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(AgriAdviseError::InvalidInput(format!(
                        "{} must be a finite number, got {}",
                        name, v
                    )));
                }
            }
        }

        Ok(())
    }
}

/// A reading persisted against a farm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherLog {
    pub id: Option<i64>,
    pub farm_id: i64,
    pub reading: WeatherReading,
    pub recorded_at: DateTime<Utc>,
}

impl WeatherLog {
    pub fn new(farm_id: i64, reading: WeatherReading) -> Self {
        Self {
            id: None,
            farm_id,
            reading,
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_soil_moisture() {
        let reading = WeatherReading::new(30.0, 25.0, 45.0).with_soil_moisture(60.0);
        assert_eq!(reading.soil_moisture_pct, Some(60.0));
        assert_eq!(WeatherReading::new(30.0, 25.0, 45.0).soil_moisture_pct, None);
    }

    #[test]
    fn validate_rejects_non_finite() {
        assert!(WeatherReading::new(f64::NAN, 0.0, 50.0).validate().is_err());
        assert!(WeatherReading::new(25.0, f64::INFINITY, 50.0)
            .validate()
            .is_err());
        assert!(WeatherReading::new(25.0, 0.0, 50.0)
            .with_soil_moisture(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn validate_accepts_out_of_simulation_range() {
        // Values outside the simulator ranges are still legal inputs
        assert!(WeatherReading::new(-5.0, 120.0, 100.0).validate().is_ok());
    }

    #[test]
    fn soil_moisture_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&WeatherReading::new(22.5, 3.0, 70.0)).unwrap();
        assert!(!json.contains("soil_moisture_pct"));

        let parsed: WeatherReading =
            serde_json::from_str(r#"{"temperature_c":22.5,"rain_forecast_mm":3.0,"humidity_pct":70.0}"#)
                .unwrap();
        assert_eq!(parsed.soil_moisture_pct, None);
    }
}
