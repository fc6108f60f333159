use garde::Validate;
use serde::{Deserialize, Serialize};

/// The only prefix the registry accepts for building numbers.
pub const BUILDING_PREFIX: &str = "B";

/// The kind of building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingType {
    Academic,
    Dorm,
    Library,
    Lab,
    Other,
}

/// The operational status of a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingStatus {
    Active,
    InMaintenance,
    Retired,
}

/// Represents a building on a campus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// The unique identifier for the building.
    pub id: String,
    /// The campus this building belongs to.
    pub campus_id: String,
    /// The number prefix, always `B`.
    pub prefix: String,
    /// The building number, e.g. `101`.
    pub building_no: String,
    /// The number of floors.
    pub floors: u32,
    /// The kind of building.
    #[serde(rename = "type")]
    pub building_type: BuildingType,
    /// The building status.
    pub status: BuildingStatus,
}

impl Building {
    /// The full building code, e.g. `B101`.
    pub fn code(&self) -> String {
        format!("{}{}", self.prefix, self.building_no)
    }
}

/// A partial set of building fields, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BuildingInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(length(min = 1))]
    pub campus_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(length(min = 1, max = 32))]
    pub building_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(range(min = 1, max = 500))]
    pub floors: Option<u32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub building_type: Option<BuildingType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub status: Option<BuildingStatus>,
}
