use garde::Validate;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        building::{Building, BuildingInput, BuildingStatus, BUILDING_PREFIX},
        campus::{Campus, CampusInput, CampusStatus},
        room::{Room, RoomInput, RoomStatus, ROOM_PREFIX},
    },
    repositories::assets as asset_repo,
    state::AppState,
    validation::assets::{non_blank, required, validate_building_prefix, validate_room_prefix},
};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Creates a new campus.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `input` - The campus fields; `code` and `name` are required.
///
/// # Returns
///
/// A `Result` containing the created `Campus`.
pub async fn create_campus(state: &AppState, input: CampusInput) -> Result<Campus> {
    input.validate()?;

    let campus = Campus {
        id: new_id(),
        code: non_blank(required(input.code, "code")?, "code")?,
        name: non_blank(required(input.name, "name")?, "name")?,
        address: input.address.unwrap_or_default(),
        status: input.status.unwrap_or(CampusStatus::Active),
    };

    let campus = asset_repo::create_campus(&state.db, campus).await;
    tracing::info!("✅ Campus created: {} ({})", campus.id, campus.code);
    Ok(campus)
}

/// Applies a partial update to a campus.
pub async fn update_campus(state: &AppState, campus_id: &str, input: CampusInput) -> Result<Campus> {
    input.validate()?;

    let mut campus = asset_repo::find_campus(&state.db, campus_id)
        .await
        .ok_or(AppError::NotFound)?;

    if let Some(code) = input.code {
        campus.code = non_blank(code, "code")?;
    }
    if let Some(name) = input.name {
        campus.name = non_blank(name, "name")?;
    }
    if let Some(address) = input.address {
        campus.address = address;
    }
    if let Some(status) = input.status {
        campus.status = status;
    }

    let campus = asset_repo::replace_campus(&state.db, campus).await?;
    tracing::info!("✅ Campus updated: {}", campus.id);
    Ok(campus)
}

/// Deletes a campus, cascading to its buildings and rooms.
pub async fn delete_campus(state: &AppState, campus_id: &str) -> Result<()> {
    let (buildings, rooms) = asset_repo::delete_campus(&state.db, campus_id).await?;
    tracing::info!(
        "🗑️ Campus deleted: {} ({} buildings, {} rooms removed with it)",
        campus_id,
        buildings,
        rooms
    );
    Ok(())
}

/// Creates a new building on an existing campus.
///
/// `prefix` defaults to `B` and `status` to `ACTIVE`.
pub async fn create_building(state: &AppState, input: BuildingInput) -> Result<Building> {
    input.validate()?;

    let prefix = input.prefix.unwrap_or_else(|| BUILDING_PREFIX.to_string());
    validate_building_prefix(&prefix)?;

    let building = Building {
        id: new_id(),
        campus_id: required(input.campus_id, "campus_id")?,
        prefix,
        building_no: non_blank(required(input.building_no, "building_no")?, "building_no")?,
        floors: required(input.floors, "floors")?,
        building_type: required(input.building_type, "type")?,
        status: input.status.unwrap_or(BuildingStatus::Active),
    };

    let building = asset_repo::create_building(&state.db, building).await?;
    tracing::info!("✅ Building created: {} on campus {}", building.code(), building.campus_id);
    Ok(building)
}

/// Applies a partial update to a building.
pub async fn update_building(
    state: &AppState,
    building_id: &str,
    input: BuildingInput,
) -> Result<Building> {
    input.validate()?;

    let mut building = asset_repo::find_building(&state.db, building_id)
        .await
        .ok_or(AppError::NotFound)?;

    if let Some(prefix) = input.prefix {
        validate_building_prefix(&prefix)?;
        building.prefix = prefix;
    }
    if let Some(campus_id) = input.campus_id {
        building.campus_id = campus_id;
    }
    if let Some(building_no) = input.building_no {
        building.building_no = non_blank(building_no, "building_no")?;
    }
    if let Some(floors) = input.floors {
        building.floors = floors;
    }
    if let Some(building_type) = input.building_type {
        building.building_type = building_type;
    }
    if let Some(status) = input.status {
        building.status = status;
    }

    let building = asset_repo::replace_building(&state.db, building).await?;
    tracing::info!("✅ Building updated: {}", building.code());
    Ok(building)
}

/// Deletes a building, cascading to its rooms.
pub async fn delete_building(state: &AppState, building_id: &str) -> Result<()> {
    let rooms = asset_repo::delete_building(&state.db, building_id).await?;
    tracing::info!("🗑️ Building deleted: {} ({} rooms removed with it)", building_id, rooms);
    Ok(())
}

/// Creates a new room in an existing building.
///
/// `prefix` defaults to `R` and `status` to `AVAILABLE`.
pub async fn create_room(state: &AppState, input: RoomInput) -> Result<Room> {
    input.validate()?;

    let prefix = input.prefix.unwrap_or_else(|| ROOM_PREFIX.to_string());
    validate_room_prefix(&prefix)?;

    let room = Room {
        id: new_id(),
        building_id: required(input.building_id, "building_id")?,
        prefix,
        room_no: non_blank(required(input.room_no, "room_no")?, "room_no")?,
        capacity: required(input.capacity, "capacity")?,
        floor: required(input.floor, "floor")?,
        room_type: required(input.room_type, "type")?,
        status: input.status.unwrap_or(RoomStatus::Available),
    };

    let room = asset_repo::create_room(&state.db, room).await?;
    tracing::info!("✅ Room created: {}{} in building {}", room.prefix, room.room_no, room.building_id);
    Ok(room)
}

/// Applies a partial update to a room.
pub async fn update_room(state: &AppState, room_id: &str, input: RoomInput) -> Result<Room> {
    input.validate()?;

    let mut room = asset_repo::find_room(&state.db, room_id)
        .await
        .ok_or(AppError::NotFound)?;

    if let Some(prefix) = input.prefix {
        validate_room_prefix(&prefix)?;
        room.prefix = prefix;
    }
    if let Some(building_id) = input.building_id {
        room.building_id = building_id;
    }
    if let Some(room_no) = input.room_no {
        room.room_no = non_blank(room_no, "room_no")?;
    }
    if let Some(capacity) = input.capacity {
        room.capacity = capacity;
    }
    if let Some(floor) = input.floor {
        room.floor = floor;
    }
    if let Some(room_type) = input.room_type {
        room.room_type = room_type;
    }
    if let Some(status) = input.status {
        room.status = status;
    }

    let room = asset_repo::replace_room(&state.db, room).await?;
    tracing::info!("✅ Room updated: {}", room.id);
    Ok(room)
}

/// Deletes a room.
pub async fn delete_room(state: &AppState, room_id: &str) -> Result<()> {
    asset_repo::delete_room(&state.db, room_id).await?;
    tracing::info!("🗑️ Room deleted: {}", room_id);
    Ok(())
}
