use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    access::{Action, Resource},
    error::{json_response, AppError, Result},
    middleware_layer::auth::CurrentUser,
    models::user::UserInput,
    repositories::user as user_repo,
    services::auth as auth_service,
    state::AppState,
};

/// The request payload for user login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The response payload for a successful login.
#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt for: {}", payload.username);

    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Authentication(
            "Invalid username or password".to_string(),
        ));
    }

    let user =
        auth_service::authenticate_user(&state, &payload.username, payload.password).await?;
    let access_token = auth_service::issue_session(&state, &user.id).await;

    tracing::info!("✅ User logged in: {}", user.id);

    json_response(
        StatusCode::OK,
        &LoginResponse {
            access_token,
            token_type: "bearer",
        },
    )
}

/// Returns the signed-in user's profile.
#[axum::debug_handler]
pub async fn me(Extension(current): Extension<CurrentUser>) -> Result<Response> {
    json_response(StatusCode::OK, &current.0)
}

/// Lists every user account.
#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Response> {
    current.authorize(Resource::UserAccount, Action::View)?;

    let users = user_repo::list_users(&state.db).await;
    json_response(StatusCode::OK, &users)
}

/// Registers a new user account.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<UserInput>,
) -> Result<Response> {
    current.authorize(Resource::UserAccount, Action::Create)?;
    tracing::info!("📝 Register attempt by {}", current.0.username);

    let user = auth_service::register_user(&state, payload).await?;
    json_response(StatusCode::CREATED, &user)
}

/// Updates a user account.
#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<String>,
    Json(payload): Json<UserInput>,
) -> Result<Response> {
    current.authorize(Resource::UserAccount, Action::Edit)?;

    let user = auth_service::update_user(&state, &user_id, payload).await?;
    json_response(StatusCode::OK, &user)
}

/// Deletes a user account.
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<StatusCode> {
    current.authorize(Resource::UserAccount, Action::Delete)?;

    auth_service::delete_user(&state, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
