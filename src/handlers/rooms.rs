use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Extension, Json,
};

use crate::{
    access::{Action, Resource},
    error::{json_response, Result},
    middleware_layer::auth::CurrentUser,
    models::room::RoomInput,
    repositories::assets as asset_repo,
    services::assets as asset_service,
    state::AppState,
};

/// Lists the rooms in a building.
#[axum::debug_handler]
pub async fn list_by_building(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(building_id): Path<String>,
) -> Result<Response> {
    current.authorize(Resource::Room, Action::View)?;

    let rooms = asset_repo::list_rooms_by_building(&state.db, &building_id).await;
    json_response(StatusCode::OK, &rooms)
}

/// Creates a new room.
#[axum::debug_handler]
pub async fn create_room(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<RoomInput>,
) -> Result<Response> {
    current.authorize(Resource::Room, Action::Create)?;

    let room = asset_service::create_room(&state, payload).await?;
    json_response(StatusCode::CREATED, &room)
}

/// Updates a room.
#[axum::debug_handler]
pub async fn update_room(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(room_id): Path<String>,
    Json(payload): Json<RoomInput>,
) -> Result<Response> {
    current.authorize(Resource::Room, Action::Edit)?;

    let room = asset_service::update_room(&state, &room_id, payload).await?;
    json_response(StatusCode::OK, &room)
}

/// Deletes a room.
#[axum::debug_handler]
pub async fn delete_room(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(room_id): Path<String>,
) -> Result<StatusCode> {
    current.authorize(Resource::Room, Action::Delete)?;

    asset_service::delete_room(&state, &room_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
