use crate::error::{AgriAdviseError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropType {
    Maize,
    Rice,
    Cassava,
}

impl CropType {
    pub fn all() -> &'static [CropType] {
        &[CropType::Maize, CropType::Rice, CropType::Cassava]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Maize => "Maize",
            CropType::Rice => "Rice",
            CropType::Cassava => "Cassava",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "maize" | "corn" => Some(CropType::Maize),
            "rice" => Some(CropType::Rice),
            "cassava" | "manioc" => Some(CropType::Cassava),
            _ => None,
        }
    }

    /// Like [`CropType::from_str`] but rejects unknown names instead of
    /// silently dropping them.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| {
            AgriAdviseError::InvalidInput(format!(
                "unknown crop type '{}' (expected Maize, Rice or Cassava)",
                s
            ))
        })
    }
}

impl std::fmt::Display for CropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthStage {
    Planting,
    Growing,
    Harvesting,
}

impl GrowthStage {
    pub fn all() -> &'static [GrowthStage] {
        &[
            GrowthStage::Planting,
            GrowthStage::Growing,
            GrowthStage::Harvesting,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Planting => "Planting",
            GrowthStage::Growing => "Growing",
            GrowthStage::Harvesting => "Harvesting",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "planting" | "plant" => Some(GrowthStage::Planting),
            "growing" | "grow" => Some(GrowthStage::Growing),
            "harvesting" | "harvest" => Some(GrowthStage::Harvesting),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| {
            AgriAdviseError::InvalidInput(format!(
                "unknown growth stage '{}' (expected Planting, Growing or Harvesting)",
                s
            ))
        })
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The slice of a farm record the crop-based rules need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmContext {
    pub owner_label: String,
    pub crop_type: CropType,
}

impl FarmContext {
    pub fn new(owner_label: impl Into<String>, crop_type: CropType) -> Self {
        Self {
            owner_label: owner_label.into(),
            crop_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Farm {
    pub id: Option<i64>,
    pub owner_name: String,
    pub crop_type: CropType,
    pub location_lat: f64,
    pub location_long: f64,
    pub planting_date: NaiveDate,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Farm {
    pub fn new(
        owner_name: impl Into<String>,
        crop_type: CropType,
        location_lat: f64,
        location_long: f64,
        planting_date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            owner_name: owner_name.into(),
            crop_type,
            location_lat,
            location_long,
            planting_date,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn context(&self) -> FarmContext {
        FarmContext::new(self.owner_name.clone(), self.crop_type)
    }

    pub fn validate(&self) -> Result<()> {
        if self.owner_name.trim().is_empty() {
            return Err(AgriAdviseError::InvalidInput(
                "farm owner name must not be empty".into(),
            ));
        }
        if !(-90.0..=90.0).contains(&self.location_lat) {
            return Err(AgriAdviseError::InvalidInput(format!(
                "latitude {} out of range [-90, 90]",
                self.location_lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.location_long) {
            return Err(AgriAdviseError::InvalidInput(format!(
                "longitude {} out of range [-180, 180]",
                self.location_long
            )));
        }
        Ok(())
    }
}
