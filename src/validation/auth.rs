use garde::Validate;

use crate::error::{AppError, Result};
use crate::models::user::UserInput;

/// Validates a username.
///
/// # Arguments
///
/// * `username` - The username to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the username is valid.
pub fn validate_username(username: &str) -> Result<()> {
    if username.len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters long".to_string(),
        ));
    }

    if username.len() > 255 {
        return Err(AppError::Validation(
            "Username must be at most 255 characters".to_string(),
        ));
    }

    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(AppError::Validation(
            "Username can only contain letters, numbers, underscores, and hyphens".to_string(),
        ));
    }

    Ok(())
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates a registration payload: every identity field is required.
pub fn validate_registration(input: &UserInput) -> Result<()> {
    input.validate()?;

    let full_name = input.full_name.as_deref().unwrap_or_default();
    if full_name.trim().is_empty() {
        return Err(AppError::Validation("Full name cannot be empty".to_string()));
    }

    let username = input
        .username
        .as_deref()
        .ok_or_else(|| AppError::Validation("Username is required".to_string()))?;
    validate_username(username)?;

    if input.email.is_none() {
        return Err(AppError::Validation("Email is required".to_string()));
    }

    let password = input
        .password
        .as_deref()
        .ok_or_else(|| AppError::Validation("Password is required".to_string()))?;
    validate_password(password)
}

/// Validates a partial user update; only the fields that are present are checked.
pub fn validate_user_update(input: &UserInput) -> Result<()> {
    input.validate()?;

    if let Some(full_name) = &input.full_name {
        if full_name.trim().is_empty() {
            return Err(AppError::Validation("Full name cannot be empty".to_string()));
        }
    }

    if let Some(username) = &input.username {
        validate_username(username)?;
    }

    if let Some(password) = &input.password {
        validate_password(password)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    fn registration() -> UserInput {
        UserInput {
            full_name: Some("Ada Lovelace".into()),
            username: Some("ada_l".into()),
            email: Some("ada@udata.edu".into()),
            password: Some("analytical".into()),
            role: Some(Role::Viewer),
            status: None,
        }
    }

    #[test]
    fn usernames_are_restricted() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("ok-name_1").is_ok());
    }

    #[test]
    fn passwords_have_length_bounds() {
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
        assert!(validate_password("password").is_ok());
    }

    #[test]
    fn registration_requires_identity_fields() {
        assert!(validate_registration(&registration()).is_ok());

        let mut missing_password = registration();
        missing_password.password = None;
        assert!(matches!(
            validate_registration(&missing_password),
            Err(AppError::Validation(_))
        ));

        let mut bad_email = registration();
        bad_email.email = Some("not-an-email".into());
        assert!(matches!(
            validate_registration(&bad_email),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn updates_only_check_present_fields() {
        assert!(validate_user_update(&UserInput::default()).is_ok());

        let rename = UserInput {
            username: Some("x".into()),
            ..Default::default()
        };
        assert!(validate_user_update(&rename).is_err());
    }
}
