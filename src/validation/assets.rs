use crate::error::{AppError, Result};
use crate::models::{building::BUILDING_PREFIX, room::ROOM_PREFIX};

/// Returns the value of a required create field, or a validation error naming it.
pub fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| AppError::Validation(format!("Field '{}' is required", field)))
}

/// Rejects blank text in a required field.
pub fn non_blank(value: String, field: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("Field '{}' cannot be empty", field)));
    }
    Ok(value)
}

/// Validates a building number prefix.
pub fn validate_building_prefix(prefix: &str) -> Result<()> {
    if prefix != BUILDING_PREFIX {
        return Err(AppError::Validation(format!(
            "Building prefix must be '{}'",
            BUILDING_PREFIX
        )));
    }
    Ok(())
}

/// Validates a room number prefix.
pub fn validate_room_prefix(prefix: &str) -> Result<()> {
    if prefix != ROOM_PREFIX {
        return Err(AppError::Validation(format!(
            "Room prefix must be '{}'",
            ROOM_PREFIX
        )));
    }
    Ok(())
}
