use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a bearer session issued by the registry service.
///
/// ⚠️ IMPORTANT: the token itself is the lookup key in the session cache and
/// is never stored inside this struct, so a `Session` can be logged safely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The ID of the user this session belongs to.
    pub user_id: String,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session for `user_id` lasting `duration_days`.
    pub fn new(user_id: String, duration_days: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            created_at: now,
            expires_at: now + chrono::Duration::days(duration_days),
        }
    }

    /// Whether the session is past its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
