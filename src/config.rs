use crate::error::{AgriAdviseError, Result};
use crate::logic::RuleSetSelection;
use crate::models::GrowthStage;
use dialoguer::{Confirm, Input, Select};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Ranges the weather simulator draws from. Defaults match the ranges the
/// demo API used for its fake live weather.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_temperature_range")]
    pub temperature_c: ValueRange,
    #[serde(default = "default_rain_range")]
    pub rain_forecast_mm: ValueRange,
    #[serde(default = "default_humidity_range")]
    pub humidity_pct: ValueRange,
    #[serde(default = "default_soil_moisture_range")]
    pub soil_moisture_pct: ValueRange,
}

fn default_temperature_range() -> ValueRange {
    ValueRange::new(20.0, 35.0)
}

fn default_rain_range() -> ValueRange {
    ValueRange::new(0.0, 60.0)
}

fn default_humidity_range() -> ValueRange {
    ValueRange::new(30.0, 90.0)
}

fn default_soil_moisture_range() -> ValueRange {
    ValueRange::new(10.0, 70.0)
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        let ranges = [
            ("temperature_c", self.temperature_c),
            ("rain_forecast_mm", self.rain_forecast_mm),
            ("humidity_pct", self.humidity_pct),
            ("soil_moisture_pct", self.soil_moisture_pct),
        ];

        for (name, range) in ranges {
            if !range.min.is_finite() || !range.max.is_finite() {
                return Err(AgriAdviseError::Config(format!(
                    "simulation.{} bounds must be finite",
                    name
                )));
            }
            if range.min > range.max {
                return Err(AgriAdviseError::Config(format!(
                    "simulation.{} min ({}) is greater than max ({})",
                    name, range.min, range.max
                )));
            }
            // Uniform sampling needs the span itself to be representable
            if !(range.max - range.min).is_finite() {
                return Err(AgriAdviseError::Config(format!(
                    "simulation.{} range is too wide",
                    name
                )));
            }
        }

        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            temperature_c: default_temperature_range(),
            rain_forecast_mm: default_rain_range(),
            humidity_pct: default_humidity_range(),
            soil_moisture_pct: default_soil_moisture_range(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_symbols")]
    pub symbols: bool,
}

fn default_symbols() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            symbols: default_symbols(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DefaultsConfig {
    /// Growth stage used by `advise` when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default)]
    pub rule_set: RuleSetSelection,
}

impl DefaultsConfig {
    pub fn growth_stage(&self) -> Result<Option<GrowthStage>> {
        self.stage.as_deref().map(GrowthStage::parse).transpose()
    }
}

impl Config {
    /// Loads the first config file found. Falls back to built-in defaults when
    /// no file exists, unless an explicit path was given.
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(AgriAdviseError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p.clone()
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        tracing::debug!(path = %config_path.display(), "Loading config");

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| AgriAdviseError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| AgriAdviseError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.defaults
            .growth_stage()
            .map_err(|e| AgriAdviseError::Config(format!("defaults.stage: {}", e)))?;
        Ok(())
    }

    /// Search for config.yaml in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("agriadvise").join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Default path for writing new config files (~/.config/agriadvise/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgriAdviseError::Config("Cannot determine config directory".into()))?
            .join("agriadvise");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    pub fn setup_interactive(target: Option<&PathBuf>) -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up AgriAdvise!");
        println!();

        let stages = ["(none)", "Planting", "Growing", "Harvesting"];
        let stage_idx = Select::new()
            .with_prompt("Default growth stage for `advise`")
            .items(&stages[..])
            .default(0)
            .interact()
            .map_err(|e| AgriAdviseError::Config(format!("Input error: {}", e)))?;
        let stage = (stage_idx > 0).then(|| stages[stage_idx].to_string());

        let rule_sets = ["all", "crop", "stage"];
        let rule_set_idx = Select::new()
            .with_prompt("Default rule set")
            .items(&rule_sets[..])
            .default(0)
            .interact()
            .map_err(|e| AgriAdviseError::Config(format!("Input error: {}", e)))?;
        let rule_set = RuleSetSelection::parse(rule_sets[rule_set_idx])?;

        let json = Confirm::new()
            .with_prompt("Print JSON instead of text?")
            .default(false)
            .interact()
            .map_err(|e| AgriAdviseError::Config(format!("Input error: {}", e)))?;

        let symbols = Confirm::new()
            .with_prompt("Prefix advisories with severity symbols?")
            .default(true)
            .interact()
            .map_err(|e| AgriAdviseError::Config(format!("Input error: {}", e)))?;

        let seed: String = Input::new()
            .with_prompt("Simulation seed (blank for random weather)")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| AgriAdviseError::Config(format!("Input error: {}", e)))?;
        let seed = if seed.trim().is_empty() {
            None
        } else {
            Some(seed.trim().parse::<u64>().map_err(|_| {
                AgriAdviseError::Config(format!("Invalid seed '{}'", seed.trim()))
            })?)
        };

        println!();

        let config = Config {
            simulation: SimulationConfig {
                seed,
                ..SimulationConfig::default()
            },
            output: OutputConfig {
                format: if json {
                    OutputFormat::Json
                } else {
                    OutputFormat::Text
                },
                symbols,
            },
            defaults: DefaultsConfig { stage, rule_set },
        };

        let config_path = match target {
            Some(p) => p.clone(),
            None => Self::default_config_path()?,
        };
        config.write_to(&config_path)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| AgriAdviseError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# AgriAdvise Configuration\n# Generated by `agriadvise init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, content)?;
        Ok(())
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| AgriAdviseError::Config(format!("Bad substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("AGRIADVISE_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| AgriAdviseError::Config("Cannot determine data directory".into()))?
            .join("agriadvise");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("agriadvise.db"))
    }
}
