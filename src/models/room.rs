use garde::Validate;
use serde::{Deserialize, Serialize};

/// The only prefix the registry accepts for room numbers.
pub const ROOM_PREFIX: &str = "R";

/// The kind of room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    LectureHall,
    Lab,
    Office,
    Storage,
    Dorm,
    Other,
}

/// The occupancy status of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
    Retired,
}

/// Represents a room inside a building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// The unique identifier for the room.
    pub id: String,
    /// The building this room belongs to.
    pub building_id: String,
    /// The number prefix, always `R`.
    pub prefix: String,
    /// The room number, e.g. `101-A`.
    pub room_no: String,
    /// The seating capacity.
    pub capacity: u32,
    /// The floor the room is on.
    pub floor: i32,
    /// The kind of room.
    #[serde(rename = "type")]
    pub room_type: RoomType,
    /// The room status.
    pub status: RoomStatus,
}

/// A partial set of room fields, used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RoomInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(length(min = 1))]
    pub building_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(length(min = 1, max = 32))]
    pub room_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(range(max = 100_000))]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(range(min = -10, max = 500))]
    pub floor: Option<i32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub room_type: Option<RoomType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub status: Option<RoomStatus>,
}
