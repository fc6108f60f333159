use crate::error::{AppError, Result};
use crate::models::session::Session;
use crate::models::user::{Role, StoredUser, User, UserInput, UserStatus};
use crate::repositories::user as user_repo;
use crate::state::AppState;
use crate::crypto::token::generate_access_token;
use crate::validation::auth::{validate_registration, validate_user_update};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 6;

/// The message returned for every failed sign-in, whatever the cause.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Hashes a password using Argon2id.
fn hash_password_blocking(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng.try_fill_bytes(&mut salt_bytes)
        .map_err(|e| AppError::Internal(format!("Failed to generate salt: {}", e)))?;

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Encryption(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Encryption(format!("Argon2 params: {}", e)))?,
    );

    let password_hash = argon2
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Encryption(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    tracing::debug!("Password hashed successfully with Argon2");
    Ok(password_hash)
}

/// Verifies a password against a hash.
fn verify_password_blocking(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Encryption(format!("Hash parse error: {}", e)))?;
    let result = Argon2::default()
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok();

    password_bytes.zeroize();
    tracing::debug!("Password verification completed");
    Ok(result)
}

/// Hashes a password on the blocking pool.
///
/// # Arguments
///
/// * `password` - The password to hash. It is zeroized once hashed.
///
/// # Returns
///
/// A `Result` containing the Argon2 PHC string.
pub async fn hash_password(mut password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let hashed = hash_password_blocking(&password);
        password.zeroize();
        hashed
    })
    .await
    .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
}

/// Verifies a password on the blocking pool.
async fn verify_password(mut password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let verified = verify_password_blocking(&password, &hash);
        password.zeroize();
        verified
    })
    .await
    .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
}

/// Authenticates a user.
///
/// Only `ACTIVE` accounts may sign in; every failure yields the same message.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `username` - The user's username.
/// * `password` - The user's password.
///
/// # Returns
///
/// A `Result` containing the authenticated `User`.
pub async fn authenticate_user(state: &AppState, username: &str, password: String) -> Result<User> {
    tracing::debug!("🔐 Authenticating user: {}", username);

    let stored = user_repo::find_by_username(&state.db, username)
        .await
        .filter(|u| u.user.is_active())
        .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(password, stored.password_hash.clone()).await? {
        return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!("✅ User authenticated: {}", stored.user.id);
    Ok(stored.user)
}

/// Issues a new bearer token for `user_id` and records its session.
pub async fn issue_session(state: &AppState, user_id: &str) -> String {
    let token = generate_access_token();
    let session = Session::new(user_id.to_string(), state.config.session_duration_days);

    state.sessions.insert(token.clone(), session).await;
    tracing::info!("✅ Session issued for user: {}", user_id);
    token
}

/// Resolves a bearer token to its user.
///
/// # Returns
///
/// A `Result` containing the `User`, or `Authentication` if the token is
/// unknown or expired, or the account is gone or no longer active.
pub async fn resolve_session(state: &AppState, token: &str) -> Result<User> {
    let session = state
        .sessions
        .get(token)
        .await
        .ok_or_else(|| AppError::Authentication("Invalid or expired token".to_string()))?;

    let stored = user_repo::find_by_id(&state.db, &session.user_id).await;
    match stored {
        Some(stored) if stored.user.is_active() => Ok(stored.user),
        _ => {
            tracing::warn!("❌ Session refers to an unusable account: {}", session.user_id);
            state.sessions.remove(token).await;
            Err(AppError::Authentication("Account is no longer active".to_string()))
        }
    }
}

/// Registers a new user account.
///
/// Role defaults to `VIEWER` and status to `ACTIVE` when omitted.
pub async fn register_user(state: &AppState, input: UserInput) -> Result<User> {
    validate_registration(&input)?;

    let UserInput {
        full_name,
        username,
        email,
        password,
        status,
        role,
    } = input;

    let password_hash = hash_password(password.unwrap_or_default()).await?;
    let stored = StoredUser {
        user: User {
            id: uuid::Uuid::new_v4().to_string(),
            full_name: full_name.unwrap_or_default(),
            username: username.unwrap_or_default(),
            email: email.unwrap_or_default(),
            status: status.unwrap_or(UserStatus::Active),
            role: role.unwrap_or(Role::Viewer),
        },
        password_hash,
    };

    let user = user_repo::create_user(&state.db, stored).await?;
    tracing::info!("✅ User registered: {} ({})", user.id, user.role);
    Ok(user)
}

/// Applies a partial update to a user account.
///
/// A blank password leaves the current one in place. Demoting an account
/// out of `ACTIVE` drops its live sessions.
pub async fn update_user(state: &AppState, user_id: &str, input: UserInput) -> Result<User> {
    let input = input.without_blank_password();
    validate_user_update(&input)?;

    if user_repo::find_by_id(&state.db, user_id).await.is_none() {
        return Err(AppError::NotFound);
    }

    let password_hash = match input.password.clone() {
        Some(password) => Some(hash_password(password).await?),
        None => None,
    };

    let user = user_repo::update_user(&state.db, user_id, &input, password_hash).await?;

    if !user.is_active() {
        state.sessions.remove_user(&user.id).await;
    }

    tracing::info!("✅ User updated: {}", user.id);
    Ok(user)
}

/// Deletes a user account and its sessions.
pub async fn delete_user(state: &AppState, user_id: &str) -> Result<()> {
    user_repo::delete_user(&state.db, user_id).await?;
    state.sessions.remove_user(user_id).await;

    tracing::info!("✅ User deleted: {}", user_id);
    Ok(())
}
