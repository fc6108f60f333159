use garde::Validate;
use serde::{Deserialize, Serialize};

/// Whether a campus is still in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampusStatus {
    Active,
    Archived,
}

/// Represents a campus, the root of the asset tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campus {
    /// The unique identifier for the campus.
    pub id: String,
    /// Short code such as `MAIN`.
    pub code: String,
    /// The display name of the campus.
    pub name: String,
    /// The postal address of the campus.
    pub address: String,
    /// The campus status.
    pub status: CampusStatus,
}

/// A partial set of campus fields, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CampusInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(length(min = 1, max = 32))]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(length(max = 500))]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub status: Option<CampusStatus>,
}
