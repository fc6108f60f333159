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
    models::building::BuildingInput,
    repositories::assets as asset_repo,
    services::assets as asset_service,
    state::AppState,
};

/// Lists the buildings on a campus.
#[axum::debug_handler]
pub async fn list_by_campus(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(campus_id): Path<String>,
) -> Result<Response> {
    current.authorize(Resource::Building, Action::View)?;

    let buildings = asset_repo::list_buildings_by_campus(&state.db, &campus_id).await;
    json_response(StatusCode::OK, &buildings)
}

/// Creates a new building.
#[axum::debug_handler]
pub async fn create_building(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<BuildingInput>,
) -> Result<Response> {
    current.authorize(Resource::Building, Action::Create)?;

    let building = asset_service::create_building(&state, payload).await?;
    json_response(StatusCode::CREATED, &building)
}

/// Updates a building.
#[axum::debug_handler]
pub async fn update_building(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(building_id): Path<String>,
    Json(payload): Json<BuildingInput>,
) -> Result<Response> {
    current.authorize(Resource::Building, Action::Edit)?;

    let building = asset_service::update_building(&state, &building_id, payload).await?;
    json_response(StatusCode::OK, &building)
}

/// Deletes a building and its rooms.
#[axum::debug_handler]
pub async fn delete_building(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(building_id): Path<String>,
) -> Result<StatusCode> {
    current.authorize(Resource::Building, Action::Delete)?;

    asset_service::delete_building(&state, &building_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
