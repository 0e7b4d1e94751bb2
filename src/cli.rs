use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agriadvise",
    version,
    about = "Weather-driven crop advisories for smallholder farms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive config setup
    Init,
    /// Validate config and open the farm registry
    Check,
    /// Insert the demo farms if the registry is empty
    Seed,
    /// Manage farm records
    #[command(subcommand)]
    Farm(FarmCommand),
    /// Advise a registered farm using simulated or supplied weather
    Advise {
        farm_id: i64,

        /// Growth stage (planting, growing, harvesting)
        #[arg(short, long)]
        stage: Option<String>,

        /// Rule set to run: crop, stage or all
        #[arg(short, long)]
        rule_set: Option<String>,

        #[command(flatten)]
        weather: WeatherArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Evaluate advisories without touching the registry
    Evaluate {
        /// Crop type (maize, rice, cassava)
        #[arg(long)]
        crop: Option<String>,

        /// Owner label used in the crop-based header
        #[arg(long, default_value = "Unnamed Farm")]
        owner: String,

        /// Growth stage (planting, growing, harvesting)
        #[arg(short, long)]
        stage: Option<String>,

        /// Rule set to run: crop, stage or all
        #[arg(short, long)]
        rule_set: Option<String>,

        #[command(flatten)]
        weather: WeatherArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List available rule sets
    Rules,
    /// Show logged weather readings for a farm
    History {
        farm_id: i64,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum FarmCommand {
    /// Register a farm
    Add {
        #[arg(long)]
        owner: String,

        /// Crop type (maize, rice, cassava)
        #[arg(long)]
        crop: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        long: f64,

        /// Planting date (YYYY-MM-DD)
        #[arg(long)]
        planting_date: String,
    },
    /// List registered farms
    List,
}

/// Weather values. When temperature, rain or humidity is missing the gaps
/// (and soil moisture) are simulated.
#[derive(Args, Debug, Clone, Default)]
pub struct WeatherArgs {
    /// Air temperature in °C
    #[arg(long, allow_hyphen_values = true)]
    pub temp: Option<f64>,

    /// Forecast rainfall in mm
    #[arg(long)]
    pub rain: Option<f64>,

    /// Relative humidity in %
    #[arg(long)]
    pub humidity: Option<f64>,

    /// Soil moisture in %
    #[arg(long)]
    pub soil_moisture: Option<f64>,
}
