use crate::config::{SimulationConfig, ValueRange};
use crate::error::Result;
use crate::models::WeatherReading;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Stand-in weather source drawing uniform readings from configured ranges.
pub struct WeatherSimulator {
    rng: StdRng,
    config: SimulationConfig,
}

impl WeatherSimulator {
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            rng,
            config: config.clone(),
        })
    }

    pub fn next_reading(&mut self) -> WeatherReading {
        let reading = WeatherReading {
            temperature_c: self.sample(self.config.temperature_c),
            rain_forecast_mm: self.sample(self.config.rain_forecast_mm),
            humidity_pct: self.sample(self.config.humidity_pct),
            soil_moisture_pct: Some(self.sample(self.config.soil_moisture_pct)),
        };

        tracing::debug!(
            temperature_c = reading.temperature_c,
            rain_forecast_mm = reading.rain_forecast_mm,
            humidity_pct = reading.humidity_pct,
            soil_moisture_pct = ?reading.soil_moisture_pct,
            "Simulated weather reading"
        );

        reading
    }

    fn sample(&mut self, range: ValueRange) -> f64 {
        let value = if range.min == range.max {
            range.min
        } else {
            self.rng.gen_range(range.min..=range.max)
        };
        round_one_decimal(value).clamp(range.min, range.max)
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed: Some(seed),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn readings_stay_in_default_ranges() {
        let mut sim = WeatherSimulator::new(&seeded(7)).unwrap();
        for _ in 0..500 {
            let r = sim.next_reading();
            assert!((20.0..=35.0).contains(&r.temperature_c));
            assert!((0.0..=60.0).contains(&r.rain_forecast_mm));
            assert!((30.0..=90.0).contains(&r.humidity_pct));
            let soil = r.soil_moisture_pct.unwrap();
            assert!((10.0..=70.0).contains(&soil));
        }
    }

    #[test]
    fn readings_are_rounded_to_one_decimal() {
        let mut sim = WeatherSimulator::new(&seeded(42)).unwrap();
        for _ in 0..50 {
            let r = sim.next_reading();
            for v in [r.temperature_c, r.rain_forecast_mm, r.humidity_pct] {
                assert!(((v * 10.0).round() - v * 10.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = WeatherSimulator::new(&seeded(1234)).unwrap();
        let mut b = WeatherSimulator::new(&seeded(1234)).unwrap();
        for _ in 0..10 {
            assert_eq!(a.next_reading(), b.next_reading());
        }
    }

    #[test]
    fn degenerate_range_returns_fixed_value() {
        let config = SimulationConfig {
            rain_forecast_mm: ValueRange::new(12.5, 12.5),
            ..seeded(3)
        };
        let mut sim = WeatherSimulator::new(&config).unwrap();
        assert_eq!(sim.next_reading().rain_forecast_mm, 12.5);
    }

    #[test]
    fn rounding_never_leaves_the_range() {
        let config = SimulationConfig {
            temperature_c: ValueRange::new(10.04, 10.04),
            humidity_pct: ValueRange::new(30.02, 30.08),
            ..seeded(9)
        };
        let mut sim = WeatherSimulator::new(&config).unwrap();
        for _ in 0..100 {
            let r = sim.next_reading();
            assert_eq!(r.temperature_c, 10.04);
            assert!((30.02..=30.08).contains(&r.humidity_pct));
        }
    }

    #[test]
    fn inverted_range_is_rejected() {
        let config = SimulationConfig {
            humidity_pct: ValueRange::new(90.0, 30.0),
            ..SimulationConfig::default()
        };
        assert!(WeatherSimulator::new(&config).is_err());
    }

    #[test]
    fn round_one_decimal_values() {
        assert_eq!(round_one_decimal(20.04), 20.0);
        assert_eq!(round_one_decimal(20.05), 20.1);
        assert_eq!(round_one_decimal(59.96), 60.0);
    }
}
