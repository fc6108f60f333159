use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use crate::{
    access::{Action, Resource},
    error::{AppError, Result},
    models::user::User,
    services::auth as auth_service,
    state::AppState,
};

/// The signed-in user, inserted into request extensions by [`require_auth`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Fails with `Forbidden` unless the user's role permits `action` on `resource`.
    pub fn authorize(&self, resource: Resource, action: Action) -> Result<()> {
        if self.0.role.permits(resource, action) {
            return Ok(());
        }

        tracing::warn!(
            "❌ {} ({}) may not {:?} {:?}",
            self.0.username,
            self.0.role,
            action,
            resource
        );
        Err(AppError::Forbidden)
    }
}

/// Extracts the bearer token from the `Authorization` header.
///
/// # Arguments
///
/// * `request` - The incoming request.
///
/// # Returns
///
/// An `Option` containing the token if the header is a non-empty bearer credential.
fn extract_bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// A middleware that requires a valid bearer session to be present.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response`, or `Authentication` (401) when the token is missing, unknown
/// or expired, or the account is no longer active.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    tracing::debug!("🔐 Checking authentication...");

    let token = extract_bearer_token(&request)
        .ok_or_else(|| {
            tracing::warn!("❌ No bearer token found");
            AppError::Authentication("Missing bearer token".to_string())
        })?
        .to_string();

    let user = auth_service::resolve_session(&state, &token).await?;

    tracing::debug!("✅ User authenticated: {}", user.id);

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
