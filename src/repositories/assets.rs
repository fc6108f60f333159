use crate::{
    db::Db,
    error::{AppError, Result},
    models::{building::Building, campus::Campus, room::Room},
};

/// Lists every campus in insertion order.
pub async fn list_campuses(db: &Db) -> Vec<Campus> {
    db.read().await.campuses.clone()
}

/// Finds a campus by its ID.
pub async fn find_campus(db: &Db, campus_id: &str) -> Option<Campus> {
    db.read()
        .await
        .campuses
        .iter()
        .find(|c| c.id == campus_id)
        .cloned()
}

/// Inserts a new campus.
pub async fn create_campus(db: &Db, campus: Campus) -> Campus {
    db.write().await.campuses.push(campus.clone());
    campus
}

/// Replaces the stored campus that has the same ID.
pub async fn replace_campus(db: &Db, campus: Campus) -> Result<Campus> {
    let mut db = db.write().await;
    let slot = db
        .campuses
        .iter_mut()
        .find(|c| c.id == campus.id)
        .ok_or(AppError::NotFound)?;
    *slot = campus.clone();
    Ok(campus)
}

/// Deletes a campus together with its buildings and their rooms.
///
/// # Returns
///
/// A `Result` containing the number of buildings and rooms removed with it.
pub async fn delete_campus(db: &Db, campus_id: &str) -> Result<(usize, usize)> {
    let mut db = db.write().await;
    let before = db.campuses.len();
    db.campuses.retain(|c| c.id != campus_id);

    if db.campuses.len() == before {
        return Err(AppError::NotFound);
    }

    let building_ids: Vec<String> = db
        .buildings
        .iter()
        .filter(|b| b.campus_id == campus_id)
        .map(|b| b.id.clone())
        .collect();

    db.buildings.retain(|b| b.campus_id != campus_id);
    let rooms_before = db.rooms.len();
    db.rooms.retain(|r| !building_ids.contains(&r.building_id));

    Ok((building_ids.len(), rooms_before - db.rooms.len()))
}

/// Lists the buildings that belong to a campus.
pub async fn list_buildings_by_campus(db: &Db, campus_id: &str) -> Vec<Building> {
    db.read()
        .await
        .buildings
        .iter()
        .filter(|b| b.campus_id == campus_id)
        .cloned()
        .collect()
}

/// Finds a building by its ID.
pub async fn find_building(db: &Db, building_id: &str) -> Option<Building> {
    db.read()
        .await
        .buildings
        .iter()
        .find(|b| b.id == building_id)
        .cloned()
}

/// Inserts a new building. The referenced campus must exist.
pub async fn create_building(db: &Db, building: Building) -> Result<Building> {
    let mut db = db.write().await;

    if !db.campuses.iter().any(|c| c.id == building.campus_id) {
        return Err(AppError::Validation(format!(
            "Campus '{}' does not exist",
            building.campus_id
        )));
    }

    db.buildings.push(building.clone());
    Ok(building)
}

/// Replaces the stored building that has the same ID. The referenced campus must exist.
pub async fn replace_building(db: &Db, building: Building) -> Result<Building> {
    let mut db = db.write().await;

    if !db.campuses.iter().any(|c| c.id == building.campus_id) {
        return Err(AppError::Validation(format!(
            "Campus '{}' does not exist",
            building.campus_id
        )));
    }

    let slot = db
        .buildings
        .iter_mut()
        .find(|b| b.id == building.id)
        .ok_or(AppError::NotFound)?;
    *slot = building.clone();
    Ok(building)
}

/// Deletes a building together with its rooms.
///
/// # Returns
///
/// A `Result` containing the number of rooms removed with it.
pub async fn delete_building(db: &Db, building_id: &str) -> Result<usize> {
    let mut db = db.write().await;
    let before = db.buildings.len();
    db.buildings.retain(|b| b.id != building_id);

    if db.buildings.len() == before {
        return Err(AppError::NotFound);
    }

    let rooms_before = db.rooms.len();
    db.rooms.retain(|r| r.building_id != building_id);
    Ok(rooms_before - db.rooms.len())
}

/// Lists the rooms inside a building.
pub async fn list_rooms_by_building(db: &Db, building_id: &str) -> Vec<Room> {
    db.read()
        .await
        .rooms
        .iter()
        .filter(|r| r.building_id == building_id)
        .cloned()
        .collect()
}

/// Finds a room by its ID.
pub async fn find_room(db: &Db, room_id: &str) -> Option<Room> {
    db.read()
        .await
        .rooms
        .iter()
        .find(|r| r.id == room_id)
        .cloned()
}

/// Inserts a new room. The referenced building must exist.
pub async fn create_room(db: &Db, room: Room) -> Result<Room> {
    let mut db = db.write().await;

    if !db.buildings.iter().any(|b| b.id == room.building_id) {
        return Err(AppError::Validation(format!(
            "Building '{}' does not exist",
            room.building_id
        )));
    }

    db.rooms.push(room.clone());
    Ok(room)
}

/// Replaces the stored room that has the same ID. The referenced building must exist.
pub async fn replace_room(db: &Db, room: Room) -> Result<Room> {
    let mut db = db.write().await;

    if !db.buildings.iter().any(|b| b.id == room.building_id) {
        return Err(AppError::Validation(format!(
            "Building '{}' does not exist",
            room.building_id
        )));
    }

    let slot = db
        .rooms
        .iter_mut()
        .find(|r| r.id == room.id)
        .ok_or(AppError::NotFound)?;
    *slot = room.clone();
    Ok(room)
}

/// Deletes a room.
pub async fn delete_room(db: &Db, room_id: &str) -> Result<()> {
    let mut db = db.write().await;
    let before = db.rooms.len();
    db.rooms.retain(|r| r.id != room_id);

    if db.rooms.len() == before {
        return Err(AppError::NotFound);
    }
    Ok(())
}
