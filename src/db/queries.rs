use crate::db::Database;
use crate::error::{AgriAdviseError, Result};
use crate::models::{CropType, Farm, WeatherLog, WeatherReading};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, types::Type, OptionalExtension, Row, TransactionBehavior};
use tracing::{info, warn};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Result of seeding the demo farms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(usize),
    AlreadySeeded,
}

impl SeedOutcome {
    pub fn message(&self) -> String {
        match self {
            SeedOutcome::Seeded(n) => format!("Seeded {} Nigerian farms successfully.", n),
            SeedOutcome::AlreadySeeded => "Data already seeded.".to_string(),
        }
    }
}

fn demo_farms() -> Vec<Farm> {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();

    vec![
        // Kano
        Farm::new("Musa Farms", CropType::Maize, 12.0022, 8.5920, date(2023, 5, 15)),
        // Enugu
        Farm::new("Chinedu Agro", CropType::Rice, 6.4584, 7.5464, date(2023, 6, 1)),
        // Ibadan
        Farm::new("Yoruba Cassava Co", CropType::Cassava, 7.3775, 3.9470, date(2023, 4, 10)),
        // Borno
        Farm::new("Biu Maize Enterprise", CropType::Maize, 10.6129, 12.1946, date(2023, 5, 20)),
        // Warri
        Farm::new("Delta Rice Fields", CropType::Rice, 5.5544, 5.7932, date(2023, 6, 10)),
    ]
}

// Farm Queries

impl Database {
    pub fn create_farm(&self, farm: &Farm) -> Result<i64> {
        farm.validate()?;

        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO farms
                    (owner_name, crop_type, location_lat, location_long, planting_date, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    farm.owner_name,
                    format!("{:?}", farm.crop_type),
                    farm.location_lat,
                    farm.location_long,
                    farm.planting_date.format(DATE_FORMAT).to_string(),
                    farm.created_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_farm(&self, id: i64) -> Result<Option<Farm>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM farms WHERE id = ?1", [id], row_to_farm)
                .optional()
                .map_err(Into::into)
        })
    }

    /// Like [`Database::get_farm`] but a missing record is an error.
    pub fn require_farm(&self, id: i64) -> Result<Farm> {
        self.get_farm(id)?
            .ok_or_else(|| AgriAdviseError::NotFound(format!("Farm {} not found", id)))
    }

    pub fn list_farms(&self) -> Result<Vec<Farm>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM farms ORDER BY id")?;
            let farms = stmt
                .query_map([], row_to_farm)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(farms)
        })
    }

    pub fn count_farms(&self) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM farms", [], |row| row.get(0))?)
        })
    }

    /// Inserts the five demo farms unless any farm already exists.
    pub fn seed_demo_farms(&self) -> Result<SeedOutcome> {
        let farms = demo_farms();
        let outcome = self.with_conn_mut(|conn| {
            // Take the write lock before counting so concurrent seeders serialize
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let existing: i64 = tx.query_row("SELECT COUNT(*) FROM farms", [], |row| row.get(0))?;
            if existing > 0 {
                return Ok(SeedOutcome::AlreadySeeded);
            }

            for farm in &farms {
                tx.execute(
                    r#"
                    INSERT INTO farms
                        (owner_name, crop_type, location_lat, location_long, planting_date, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    params![
                        farm.owner_name,
                        format!("{:?}", farm.crop_type),
                        farm.location_lat,
                        farm.location_long,
                        farm.planting_date.format(DATE_FORMAT).to_string(),
                        farm.created_at.to_rfc3339(),
                    ],
                )?;
            }
            tx.commit()?;
            Ok(SeedOutcome::Seeded(farms.len()))
        })?;

        if let SeedOutcome::Seeded(count) = outcome {
            info!(count, "Seeded demo farms");
        }
        Ok(outcome)
    }
}

fn row_to_farm(row: &Row) -> rusqlite::Result<Farm> {
    let crop_type_str: String = row.get("crop_type")?;
    let planting_date_str: String = row.get("planting_date")?;
    let created_at_str: String = row.get("created_at")?;

    // An unknown crop would silently skip every crop rule, so refuse the row
    let crop_type = CropType::parse(&crop_type_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    let planting_date = NaiveDate::parse_from_str(&planting_date_str, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(Farm {
        id: Some(row.get("id")?),
        owner_name: row.get("owner_name")?,
        crop_type,
        location_lat: row.get("location_lat")?,
        location_long: row.get("location_long")?,
        planting_date,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| {
                warn!(created_at = %created_at_str, "Unparseable created_at in database");
                Utc::now()
            }),
    })
}

// Weather Log Queries

impl Database {
    pub fn log_weather(&self, log: &WeatherLog) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO weather_logs
                    (farm_id, temperature_c, rain_forecast_mm, humidity_pct, soil_moisture_pct, recorded_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    log.farm_id,
                    log.reading.temperature_c,
                    log.reading.rain_forecast_mm,
                    log.reading.humidity_pct,
                    log.reading.soil_moisture_pct,
                    // Fixed width so ORDER BY on the text column is chronological
                    log.recorded_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Most recent readings first.
    pub fn recent_weather_logs(&self, farm_id: i64, limit: usize) -> Result<Vec<WeatherLog>> {
        let limit = i64::try_from(limit).map_err(|_| {
            AgriAdviseError::InvalidInput(format!("history limit {} is too large", limit))
        })?;

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM weather_logs WHERE farm_id = ?1 \
                 ORDER BY recorded_at DESC, id DESC LIMIT ?2",
            )?;
            let logs = stmt
                .query_map(params![farm_id, limit], row_to_weather_log)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(logs)
        })
    }
}

fn row_to_weather_log(row: &Row) -> rusqlite::Result<WeatherLog> {
    let recorded_at_str: String = row.get("recorded_at")?;

    Ok(WeatherLog {
        id: Some(row.get("id")?),
        farm_id: row.get("farm_id")?,
        reading: WeatherReading {
            temperature_c: row.get("temperature_c")?,
            rain_forecast_mm: row.get("rain_forecast_mm")?,
            humidity_pct: row.get("humidity_pct")?,
            soil_moisture_pct: row.get("soil_moisture_pct")?,
        },
        recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| {
                warn!(recorded_at = %recorded_at_str, "Unparseable recorded_at in database");
                Utc::now()
            }),
    })
}
