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
    models::campus::CampusInput,
    repositories::assets as asset_repo,
    services::assets as asset_service,
    state::AppState,
};

/// Lists every campus.
#[axum::debug_handler]
pub async fn list_campuses(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response> {
    current.authorize(Resource::Campus, Action::View)?;

    let campuses = asset_repo::list_campuses(&state.db).await;
    json_response(StatusCode::OK, &campuses)
}

/// Creates a new campus.
#[axum::debug_handler]
pub async fn create_campus(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CampusInput>,
) -> Result<Response> {
    current.authorize(Resource::Campus, Action::Create)?;

    let campus = asset_service::create_campus(&state, payload).await?;
    json_response(StatusCode::CREATED, &campus)
}

/// Updates a campus.
#[axum::debug_handler]
pub async fn update_campus(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(campus_id): Path<String>,
    Json(payload): Json<CampusInput>,
) -> Result<Response> {
    current.authorize(Resource::Campus, Action::Edit)?;

    let campus = asset_service::update_campus(&state, &campus_id, payload).await?;
    json_response(StatusCode::OK, &campus)
}

/// Deletes a campus and everything below it.
#[axum::debug_handler]
pub async fn delete_campus(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(campus_id): Path<String>,
) -> Result<StatusCode> {
    current.authorize(Resource::Campus, Action::Delete)?;

    asset_service::delete_campus(&state, &campus_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
