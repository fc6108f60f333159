use crate::{
    db::Db,
    error::{AppError, Result},
    models::user::{StoredUser, User, UserInput},
};

/// Lists every user account in insertion order.
pub async fn list_users(db: &Db) -> Vec<User> {
    db.read().await.users.iter().map(|u| u.user.clone()).collect()
}

/// Finds a user by their ID.
pub async fn find_by_id(db: &Db, user_id: &str) -> Option<StoredUser> {
    db.read()
        .await
        .users
        .iter()
        .find(|u| u.user.id == user_id)
        .cloned()
}

/// Finds a user by their username.
pub async fn find_by_username(db: &Db, username: &str) -> Option<StoredUser> {
    db.read()
        .await
        .users
        .iter()
        .find(|u| u.user.username == username)
        .cloned()
}

/// Inserts a new user account.
///
/// # Arguments
///
/// * `db` - The registry tables.
/// * `stored` - The account, with its password already hashed.
///
/// # Returns
///
/// A `Result` containing the public `User`, or `Conflict` if the username is taken.
pub async fn create_user(db: &Db, stored: StoredUser) -> Result<User> {
    let mut db = db.write().await;

    if db.users.iter().any(|u| u.user.username == stored.user.username) {
        return Err(AppError::Conflict(format!(
            "Username '{}' is already taken",
            stored.user.username
        )));
    }

    let user = stored.user.clone();
    db.users.push(stored);
    Ok(user)
}

/// Applies a partial update to a user account.
///
/// # Arguments
///
/// * `db` - The registry tables.
/// * `user_id` - The ID of the user to update.
/// * `input` - The fields to change. `input.password` is ignored.
/// * `password_hash` - The new password hash, if the password changes.
///
/// # Returns
///
/// A `Result` containing the updated `User`.
pub async fn update_user(
    db: &Db,
    user_id: &str,
    input: &UserInput,
    password_hash: Option<String>,
) -> Result<User> {
    let mut db = db.write().await;

    if let Some(username) = &input.username {
        if db
            .users
            .iter()
            .any(|u| u.user.username == *username && u.user.id != user_id)
        {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                username
            )));
        }
    }

    let stored = db
        .users
        .iter_mut()
        .find(|u| u.user.id == user_id)
        .ok_or(AppError::NotFound)?;

    if let Some(full_name) = &input.full_name {
        stored.user.full_name = full_name.clone();
    }
    if let Some(username) = &input.username {
        stored.user.username = username.clone();
    }
    if let Some(email) = &input.email {
        stored.user.email = email.clone();
    }
    if let Some(status) = input.status {
        stored.user.status = status;
    }
    if let Some(role) = input.role {
        stored.user.role = role;
    }
    if let Some(hash) = password_hash {
        stored.password_hash = hash;
    }

    Ok(stored.user.clone())
}

/// Deletes a user account.
pub async fn delete_user(db: &Db, user_id: &str) -> Result<()> {
    let mut db = db.write().await;
    let before = db.users.len();
    db.users.retain(|u| u.user.id != user_id);

    if db.users.len() == before {
        return Err(AppError::NotFound);
    }
    Ok(())
}
