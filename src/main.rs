mod cli;

use agriadvise::config::{Config, OutputFormat, SimulationConfig};
use agriadvise::db::Database;
use agriadvise::logic::{AdvisoryContext, AdvisoryEngine, RuleSetSelection, WeatherSimulator};
use agriadvise::models::{
    AdvisoryReport, CropType, Farm, FarmContext, GrowthStage, WeatherLog, WeatherReading,
};
use agriadvise::report;
use agriadvise::{AgriAdviseError, Result};
use chrono::NaiveDate;
use clap::Parser;
use cli::{Cli, Commands, FarmCommand, WeatherArgs};
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let engine = AdvisoryEngine::new();

    match cli.command {
        Commands::Init => {
            Config::setup_interactive(cli.config.as_ref())?;
        }
        Commands::Check => {
            let config = Config::load(cli.config.as_ref())?;
            let db = open_db(&cli)?;
            println!("Config: OK");
            println!(
                "Simulation: temp {:?}, rain {:?}, humidity {:?}, soil {:?}",
                config.simulation.temperature_c,
                config.simulation.rain_forecast_mm,
                config.simulation.humidity_pct,
                config.simulation.soil_moisture_pct
            );
            println!(
                "Registry: {} ({} farms)",
                db.path().display(),
                db.count_farms()?
            );
            for (id, name) in engine.list_rule_sets() {
                println!("Rule set: {} ({})", id, name);
            }
        }
        Commands::Seed => {
            let db = open_db(&cli)?;
            println!("{}", db.seed_demo_farms()?.message());
        }
        Commands::Farm(FarmCommand::Add {
            ref owner,
            ref crop,
            lat,
            long,
            ref planting_date,
        }) => {
            let db = open_db(&cli)?;
            let planting_date = NaiveDate::parse_from_str(planting_date, "%Y-%m-%d")
                .map_err(|e| {
                    AgriAdviseError::InvalidInput(format!(
                        "planting date '{}' is not YYYY-MM-DD: {}",
                        planting_date, e
                    ))
                })?;
            let farm = Farm::new(owner.as_str(), CropType::parse(crop)?, lat, long, planting_date);
            let id = db.create_farm(&farm)?;
            println!("Created farm {} ({}, {})", id, farm.owner_name, farm.crop_type);
        }
        Commands::Farm(FarmCommand::List) => {
            let db = open_db(&cli)?;
            let farms = db.list_farms()?;
            if farms.is_empty() {
                println!("No farms registered. Run `agriadvise seed` to add demo farms.");
            }
            for farm in farms {
                println!(
                    "{:>4}  {:<24} {:<8} ({:.4}, {:.4})  planted {}",
                    farm.id.unwrap_or_default(),
                    farm.owner_name,
                    farm.crop_type,
                    farm.location_lat,
                    farm.location_long,
                    farm.planting_date
                );
            }
        }
        Commands::Advise {
            farm_id,
            ref stage,
            ref rule_set,
            ref weather,
            json,
        } => {
            let config = Config::load(cli.config.as_ref())?;
            let db = open_db(&cli)?;
            let report = advise_farm(
                &db,
                &engine,
                &config,
                farm_id,
                stage.as_deref(),
                rule_set.as_deref(),
                weather,
            )?;
            print_report(&report, &config, json)?;
        }
        Commands::Evaluate {
            ref crop,
            ref owner,
            ref stage,
            ref rule_set,
            ref weather,
            json,
        } => {
            let config = Config::load(cli.config.as_ref())?;
            let crop = crop.as_deref().map(CropType::parse).transpose()?;
            let stage = stage.as_deref().map(GrowthStage::parse).transpose()?;
            let selection = resolve_selection(rule_set.as_deref(), &config)?;
            let reading = resolve_weather(weather, &config.simulation)?;

            let mut ctx = AdvisoryContext::new();
            if let Some(crop) = crop {
                ctx = ctx.with_farm(FarmContext::new(owner.as_str(), crop));
            }
            if let Some(stage) = stage {
                ctx = ctx.with_stage(stage);
            }

            let report = AdvisoryReport {
                farm: crop.map(|_| owner.clone()),
                crop,
                stage,
                current_weather: reading,
                advice: engine.evaluate_selected(selection, &reading, &ctx)?,
            };
            print_report(&report, &config, json)?;
        }
        Commands::Rules => {
            for (id, name) in engine.list_rule_sets() {
                println!("{:<12} {}", id, name);
            }
        }
        Commands::History { farm_id, limit } => {
            let db = open_db(&cli)?;
            let farm = db.require_farm(farm_id)?;
            println!("Weather history for {} ({})", farm.owner_name, farm.crop_type);
            print!("{}", report::render_history(&db.recent_weather_logs(farm_id, limit)?));
        }
    }

    Ok(())
}

/// Evaluates a registered farm and logs the reading. Nothing is written when
/// evaluation fails.
fn advise_farm(
    db: &Database,
    engine: &AdvisoryEngine,
    config: &Config,
    farm_id: i64,
    stage: Option<&str>,
    rule_set: Option<&str>,
    weather: &WeatherArgs,
) -> Result<AdvisoryReport> {
    let farm = db.require_farm(farm_id)?;

    let stage = match stage {
        Some(s) => Some(GrowthStage::parse(s)?),
        None => config.defaults.growth_stage()?,
    };
    let selection = resolve_selection(rule_set, config)?;
    let reading = resolve_weather(weather, &config.simulation)?;

    let mut ctx = AdvisoryContext::new().with_farm(farm.context());
    if let Some(stage) = stage {
        ctx = ctx.with_stage(stage);
    }
    let advice = engine.evaluate_selected(selection, &reading, &ctx)?;

    db.log_weather(&WeatherLog::new(farm_id, reading))?;

    Ok(AdvisoryReport {
        farm: Some(farm.owner_name),
        crop: Some(farm.crop_type),
        stage,
        current_weather: reading,
        advice,
    })
}

fn open_db(cli: &Cli) -> Result<Database> {
    Database::open(&Config::db_path(cli.data_dir.as_ref())?)
}

fn resolve_selection(flag: Option<&str>, config: &Config) -> Result<RuleSetSelection> {
    match flag {
        Some(s) => RuleSetSelection::parse(s),
        None => Ok(config.defaults.rule_set),
    }
}

/// Uses the supplied values as-is when temperature, rain and humidity are all
/// given; otherwise fills the gaps from the simulator.
fn resolve_weather(args: &WeatherArgs, simulation: &SimulationConfig) -> Result<WeatherReading> {
    let reading = match (args.temp, args.rain, args.humidity) {
        (Some(temperature_c), Some(rain_forecast_mm), Some(humidity_pct)) => WeatherReading {
            temperature_c,
            rain_forecast_mm,
            humidity_pct,
            soil_moisture_pct: args.soil_moisture,
        },
        _ => {
            let simulated = WeatherSimulator::new(simulation)?.next_reading();
            WeatherReading {
                temperature_c: args.temp.unwrap_or(simulated.temperature_c),
                rain_forecast_mm: args.rain.unwrap_or(simulated.rain_forecast_mm),
                humidity_pct: args.humidity.unwrap_or(simulated.humidity_pct),
                soil_moisture_pct: args.soil_moisture.or(simulated.soil_moisture_pct),
            }
        }
    };

    reading.validate()?;
    Ok(reading)
}

fn print_report(report: &AdvisoryReport, config: &Config, json: bool) -> Result<()> {
    let format = if json {
        OutputFormat::Json
    } else {
        config.output.format
    };
    print!("{}", report::render(report, format, config.output.symbols)?);
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}
