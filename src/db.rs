use std::sync::Arc;
use tokio::sync::RwLock;
use crate::{
    error::Result,
    models::{
        building::{Building, BuildingStatus, BuildingType, BUILDING_PREFIX},
        campus::{Campus, CampusStatus},
        room::{Room, RoomStatus, RoomType, ROOM_PREFIX},
        user::{Role, StoredUser, User, UserStatus},
    },
    services::auth::hash_password,
};

/// The in-memory registry tables.
///
/// Rows keep insertion order, which is the order every list endpoint returns.
#[derive(Debug, Default)]
pub struct Database {
    /// User accounts with their password hashes.
    pub users: Vec<StoredUser>,
    /// Campuses, the roots of the asset tree.
    pub campuses: Vec<Campus>,
    /// Buildings, each referencing a campus.
    pub buildings: Vec<Building>,
    /// Rooms, each referencing a building.
    pub rooms: Vec<Room>,
}

/// A shared handle to the registry tables.
pub type Db = Arc<RwLock<Database>>;

/// Creates the registry tables, seeded with the demo data set.
///
/// # Arguments
///
/// * `seed_password` - The password given to every seeded account.
///
/// # Returns
///
/// A `Result` containing the shared `Db` handle.
pub async fn create_database(seed_password: &str) -> Result<Db> {
    let password_hash = hash_password(seed_password.to_string()).await?;

    let seed_user = |id: &str, full_name: &str, username: &str, role: Role| StoredUser {
        user: User {
            id: id.to_string(),
            full_name: full_name.to_string(),
            username: username.to_string(),
            email: format!("{}@udata.edu", username),
            status: UserStatus::Active,
            role,
        },
        password_hash: password_hash.clone(),
    };

    let database = Database {
        users: vec![
            seed_user("1", "System Admin", "admin", Role::Admin),
            seed_user("2", "Data Manager", "manager", Role::DataManager),
            seed_user("3", "Staff Viewer", "viewer", Role::Viewer),
        ],
        campuses: vec![
            Campus {
                id: "c1".to_string(),
                code: "MAIN".to_string(),
                name: "Main Campus".to_string(),
                address: "123 University Ave".to_string(),
                status: CampusStatus::Active,
            },
            Campus {
                id: "c2".to_string(),
                code: "WEST".to_string(),
                name: "West Side Campus".to_string(),
                address: "456 College Blvd".to_string(),
                status: CampusStatus::Active,
            },
        ],
        buildings: vec![
            Building {
                id: "b1".to_string(),
                campus_id: "c1".to_string(),
                prefix: BUILDING_PREFIX.to_string(),
                building_no: "101".to_string(),
                floors: 4,
                building_type: BuildingType::Lab,
                status: BuildingStatus::Active,
            },
            Building {
                id: "b2".to_string(),
                campus_id: "c1".to_string(),
                prefix: BUILDING_PREFIX.to_string(),
                building_no: "202".to_string(),
                floors: 3,
                building_type: BuildingType::Academic,
                status: BuildingStatus::Active,
            },
        ],
        rooms: vec![
            Room {
                id: "r1".to_string(),
                building_id: "b1".to_string(),
                prefix: ROOM_PREFIX.to_string(),
                room_no: "101-A".to_string(),
                capacity: 50,
                floor: 1,
                room_type: RoomType::LectureHall,
                status: RoomStatus::Available,
            },
            Room {
                id: "r2".to_string(),
                building_id: "b1".to_string(),
                prefix: ROOM_PREFIX.to_string(),
                room_no: "205".to_string(),
                capacity: 20,
                floor: 2,
                room_type: RoomType::Lab,
                status: RoomStatus::Occupied,
            },
        ],
    };

    tracing::info!(
        "✅ Registry seeded: {} users, {} campuses, {} buildings, {} rooms",
        database.users.len(),
        database.campuses.len(),
        database.buildings.len(),
        database.rooms.len()
    );

    Ok(Arc::new(RwLock::new(database)))
}
